use super::types::Point;

/// Serialize a path to the textual path format.
///
/// Format: `(0,0)-(0,-20)-(100,-20)`
pub fn path_to_string(path: &[Point]) -> String {
    path.iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a path from the textual path format.
///
/// Format: `(0,0)-(0,-20)-(100,-20)`. Whitespace around points is ignored.
///
/// Returns `None` if the string is malformed or empty.
pub fn string_to_path(s: &str) -> Option<Vec<Point>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    tokenize(s)?.iter().map(|token| parse_point(token)).collect()
}

/// Split a path string into `(x,y)` tokens.
///
/// Negative coordinates contain `-`, so splitting on the separator is not enough: a `-` is
/// only a separator between a `)` and the next `(`.
fn tokenize(s: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = s.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek() != Some(&'(') {
            return None;
        }

        let mut token = String::new();
        for ch in chars.by_ref() {
            token.push(ch);
            if ch == ')' {
                break;
            }
        }
        if !token.ends_with(')') {
            return None;
        }
        tokens.push(token);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some('-') => continue,
            Some(_) => return None,
        }
    }

    Some(tokens)
}

/// Parse a point token like `(3,-2)`.
fn parse_point(s: &str) -> Option<Point> {
    let inner = s.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_format_path() {
        let path = [Point::new(0, 0), Point::new(0, -20), Point::new(100, -20)];
        assert_eq!(path_to_string(&path), "(0,0)-(0,-20)-(100,-20)");
    }

    #[test]
    fn test_format_single_point() {
        assert_eq!(path_to_string(&[Point::new(5, 7)]), "(5,7)");
    }

    #[test]
    fn test_tokenize_negative_coords() {
        let tokens = tokenize("(-1,-1)-(-1,5)").unwrap();
        assert_eq!(tokens, vec!["(-1,-1)", "(-1,5)"]);
    }

    #[test]
    fn test_tokenize_whitespace() {
        let tokens = tokenize("(1, 1) - (2, 1)").unwrap();
        assert_eq!(tokens, vec!["(1, 1)", "(2, 1)"]);
    }

    #[test]
    fn test_tokenize_rejects_trailing_separator() {
        assert_eq!(tokenize("(1,1)-"), None);
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("(3,-2)"), Some(Point::new(3, -2)));
        assert_eq!(parse_point("( 3 , 2 )"), Some(Point::new(3, 2)));
        assert_eq!(parse_point("(3)"), None);
        assert_eq!(parse_point("(1.5,2)"), None);
    }
}
