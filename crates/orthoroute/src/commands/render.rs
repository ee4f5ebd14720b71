use anyhow::{Context, Result};
use colored::Colorize;
use image::{Rgb, RgbImage};
use std::path::Path;

use orthoroute::router::types::is_orthogonal;
use orthoroute::scene::Scene;
use orthoroute::{Point, Rect, Routed, Strategy};

use crate::config::Config;

/// Blank border around the drawing, in diagram units.
const PADDING: i32 = 20;

/// Largest image side we are willing to allocate.
const MAX_SIDE: u32 = 16_384;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const CANVAS: Rgb<u8> = Rgb([200, 200, 200]);
const SHAPE_FILL: Rgb<u8> = Rgb([220, 232, 246]);
const SHAPE_BORDER: Rgb<u8> = Rgb([52, 101, 164]);
const OBSTACLE: Rgb<u8> = Rgb([186, 189, 182]);
const COVER: Rgb<u8> = Rgb([238, 238, 236]);
const LINE: Rgb<u8> = Rgb([85, 87, 83]);
const ENDPOINT: Rgb<u8> = Rgb([0, 0, 0]);

/// Run the render command.
pub fn run(
    scene_path: &Path,
    output: &Path,
    scale: u32,
    margin: Option<&str>,
    quiet: bool,
) -> Result<()> {
    if scale == 0 {
        anyhow::bail!("Scale must be at least 1");
    }

    let config = Config::load_or_default();
    let scene = super::load_scene(scene_path, margin, &config)?;
    let routed = scene.route_all(&config.route_options())?;

    let image = draw(&scene, &routed, scale)?;
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if !quiet {
        eprintln!(
            "{} {} ({}x{}, {} connector(s))",
            "Rendered".green().bold(),
            output.display(),
            image.width(),
            image.height(),
            routed.len()
        );
    }
    Ok(())
}

/// Paint the scene, the escape covers of every connector and the routed paths.
fn draw(scene: &Scene, routed: &[Routed], scale: u32) -> Result<RgbImage> {
    let bounds = scene_bounds(scene, routed).inflate(orthoroute::Size::square(PADDING));
    let mut canvas = Canvas::new(bounds, scale)?;

    if let Some(area) = scene.canvas {
        canvas.outline_rect(area, CANVAS, 1);
    }
    for connector in &scene.connectors {
        let request = scene.request(connector)?;
        for &(a, b) in &request.lines {
            canvas.segment(a, b, COVER, 1);
        }
    }
    for obstacle in &scene.obstacles {
        canvas.fill_rect(*obstacle, OBSTACLE);
    }
    for shape in &scene.shapes {
        canvas.fill_rect(shape.bounds, SHAPE_FILL);
        canvas.outline_rect(shape.bounds, SHAPE_BORDER, 1);
    }
    for &(a, b) in &scene.lines {
        canvas.segment(a, b, LINE, 1);
    }
    for &p in &scene.points {
        canvas.segment(Point::new(p.x - 2, p.y), Point::new(p.x + 2, p.y), LINE, 1);
        canvas.segment(Point::new(p.x, p.y - 2), Point::new(p.x, p.y + 2), LINE, 1);
    }

    for r in routed {
        let color = strategy_color(r.strategy);
        if is_orthogonal(&r.path) {
            for w in r.path.windows(2) {
                canvas.segment(w[0], w[1], color, 2);
            }
        }
        for p in [r.path.first(), r.path.last()].into_iter().flatten() {
            canvas.fill_rect(Rect::new(p.x - 1, p.y - 1, 2, 2), ENDPOINT);
        }
    }

    Ok(canvas.image)
}

fn strategy_color(strategy: Strategy) -> Rgb<u8> {
    match strategy {
        Strategy::General => Rgb([78, 154, 6]),
        Strategy::Relaxed => Rgb([196, 160, 0]),
        Strategy::Direct => Rgb([204, 0, 0]),
    }
}

/// Smallest rectangle holding the canvas, every shape, obstacle and routed point.
fn scene_bounds(scene: &Scene, routed: &[Routed]) -> Rect {
    let corners = |r: &Rect| [Point::new(r.left(), r.top()), Point::new(r.right(), r.bottom())];
    let points: Vec<Point> = scene
        .canvas
        .iter()
        .chain(scene.shapes.iter().map(|s| &s.bounds))
        .chain(&scene.obstacles)
        .flat_map(corners)
        .chain(scene.lines.iter().flat_map(|&(a, b)| [a, b]))
        .chain(scene.points.iter().copied())
        .chain(routed.iter().flat_map(|r| r.path.iter().copied()))
        .collect();

    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min, mut max) = (*first, *first);
    for p in &points {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    Rect::from_corners(min, max)
}

/// Pixel buffer addressed in diagram coordinates.
struct Canvas {
    image: RgbImage,
    origin: Point,
    scale: i64,
}

impl Canvas {
    fn new(bounds: Rect, scale: u32) -> Result<Self> {
        let width = u32::try_from(bounds.width.max(1))?.saturating_mul(scale);
        let height = u32::try_from(bounds.height.max(1))?.saturating_mul(scale);
        if width > MAX_SIDE || height > MAX_SIDE {
            anyhow::bail!(
                "Image would be {width}x{height} pixels (limit {MAX_SIDE}). Use a smaller --scale."
            );
        }
        Ok(Self {
            image: RgbImage::from_pixel(width, height, BACKGROUND),
            origin: Point::new(bounds.left(), bounds.top()),
            scale: i64::from(scale),
        })
    }

    fn to_pixel(&self, p: Point) -> (i64, i64) {
        (
            (i64::from(p.x) - i64::from(self.origin.x)) * self.scale,
            (i64::from(p.y) - i64::from(self.origin.y)) * self.scale,
        )
    }

    /// Fill pixels in `[x0, x1) x [y0, y1)`, clipped to the image.
    fn fill_pixels(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        let (w, h) = (i64::from(self.image.width()), i64::from(self.image.height()));
        for y in y0.max(0)..y1.min(h) {
            for x in x0.max(0)..x1.min(w) {
                // Both coordinates were clipped to the image size, which fits in u32.
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb<u8>) {
        let (x0, y0) = self.to_pixel(Point::new(rect.left(), rect.top()));
        let (x1, y1) = self.to_pixel(Point::new(rect.right(), rect.bottom()));
        self.fill_pixels(x0, y0, x1, y1, color);
    }

    fn outline_rect(&mut self, rect: Rect, color: Rgb<u8>, thickness: i64) {
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        self.segment(Point::new(l, t), Point::new(r, t), color, thickness);
        self.segment(Point::new(r, t), Point::new(r, b), color, thickness);
        self.segment(Point::new(l, b), Point::new(r, b), color, thickness);
        self.segment(Point::new(l, t), Point::new(l, b), color, thickness);
    }

    /// Draw an axis-aligned segment `thickness` pixels wide. Diagonal pairs are skipped.
    fn segment(&mut self, a: Point, b: Point, color: Rgb<u8>, thickness: i64) {
        if a.x != b.x && a.y != b.y {
            return;
        }
        let (ax, ay) = self.to_pixel(a);
        let (bx, by) = self.to_pixel(b);
        let half = thickness / 2;
        self.fill_pixels(
            ax.min(bx) - half,
            ay.min(by) - half,
            ax.max(bx) - half + thickness,
            ay.max(by) - half + thickness,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orthoroute::RouteOptions;

    const SCENE: &str = "\
shapes:
  - name: a
    bounds: { x: 0, y: 0, width: 40, height: 40 }
  - name: b
    bounds: { x: 100, y: 0, width: 40, height: 40 }
connectors:
  - from: { shape: a, edge: right }
    to: { shape: b, edge: left }
";

    #[test]
    fn test_scene_bounds_cover_shapes_and_paths() {
        let scene = Scene::from_yaml_str(SCENE).unwrap();
        let routed = vec![Routed {
            path: vec![Point::new(40, 20), Point::new(40, -30), Point::new(100, -30)],
            strategy: Strategy::General,
        }];
        assert_eq!(scene_bounds(&scene, &routed), Rect::new(0, -30, 140, 70));
    }

    #[test]
    fn test_empty_scene_bounds() {
        assert_eq!(scene_bounds(&Scene::default(), &[]), Rect::default());
    }

    #[test]
    fn test_segment_paints_pixels() {
        let mut canvas = Canvas::new(Rect::new(0, 0, 10, 10), 1).unwrap();
        canvas.segment(Point::new(2, 5), Point::new(8, 5), LINE, 1);
        assert_eq!(*canvas.image.get_pixel(2, 5), LINE);
        assert_eq!(*canvas.image.get_pixel(8, 5), LINE);
        assert_eq!(*canvas.image.get_pixel(5, 6), BACKGROUND);
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut canvas = Canvas::new(Rect::new(0, 0, 10, 10), 2).unwrap();
        canvas.fill_rect(Rect::new(-50, -50, 200, 200), OBSTACLE);
        assert_eq!(*canvas.image.get_pixel(0, 0), OBSTACLE);
        assert_eq!(*canvas.image.get_pixel(19, 19), OBSTACLE);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        assert!(Canvas::new(Rect::new(0, 0, 10_000, 10), 4).is_err());
    }

    #[test]
    fn test_draw_scene() {
        let scene = Scene::from_yaml_str(SCENE).unwrap();
        let routed = scene.route_all(&RouteOptions::default()).unwrap();
        let image = draw(&scene, &routed, 1).unwrap();
        let bounds = scene_bounds(&scene, &routed);
        assert_eq!(image.width(), (bounds.width + 2 * PADDING) as u32);
        // Shape a's interior, away from borders and covers.
        let x = (PADDING - bounds.x + 20) as u32;
        let y = (PADDING - bounds.y + 10) as u32;
        assert_eq!(*image.get_pixel(x, y), SHAPE_FILL);
    }
}
