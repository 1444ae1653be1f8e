//! CPU rasterizer.

use crate::assets::StickerAssets;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use artfolio_core::shapes::{PathData, Sticker};
use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;

/// Rasterizes a scene into an RGBA image without a GPU.
///
/// Strokes are drawn as round-capped, round-joined polylines with an
/// analytic one-pixel anti-aliasing ramp. Stickers are sampled
/// nearest-neighbor through the inverse of their transform.
pub struct RasterRenderer<'a> {
    assets: &'a StickerAssets,
}

impl<'a> RasterRenderer<'a> {
    pub fn new(assets: &'a StickerAssets) -> Self {
        Self { assets }
    }

    fn draw_polyline(&self, target: &mut RgbaImage, points: &[Point], width: f64, color: [u8; 4]) {
        if points.is_empty() || width.is_nan() || width <= 0.0 {
            return;
        }
        let radius = width / 2.0;
        let reach = radius + 1.0;

        let mut bounds = Rect::from_points(points[0], points[0]);
        for p in &points[1..] {
            bounds = bounds.union_pt(*p);
        }
        let Some(region) = clip_to_image(bounds.inflate(reach, reach), target) else {
            return;
        };

        // Max coverage per pixel across all segments so overlapping joints
        // are not blended twice.
        let cols = region.width();
        let mut coverage = vec![0.0f32; (cols * region.height()) as usize];

        let segments: Vec<(Point, Point)> = if points.len() == 1 {
            vec![(points[0], points[0])]
        } else {
            points.windows(2).map(|w| (w[0], w[1])).collect()
        };

        for (a, b) in segments {
            let seg = Rect::from_points(a, b).inflate(reach, reach);
            let Some(seg) = clip_to_image(seg, target) else {
                continue;
            };
            for y in seg.y0..seg.y1 {
                for x in seg.x0..seg.x1 {
                    let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                    let dist = distance_to_segment(center, a, b);
                    let c = (radius + 0.5 - dist).clamp(0.0, 1.0) as f32;
                    if c > 0.0 {
                        let idx = ((y - region.y0) * cols + (x - region.x0)) as usize;
                        if c > coverage[idx] {
                            coverage[idx] = c;
                        }
                    }
                }
            }
        }

        for y in region.y0..region.y1 {
            for x in region.x0..region.x1 {
                let c = coverage[((y - region.y0) * cols + (x - region.x0)) as usize];
                if c > 0.0 {
                    blend_pixel(target, x, y, color, c);
                }
            }
        }
    }

    fn draw_path(&self, target: &mut RgbaImage, path: &PathData, width: f64, color: [u8; 4], scale: f64) {
        let points: Vec<Point> = path
            .points()
            .into_iter()
            .map(|p| Point::new(p.x * scale, p.y * scale))
            .collect();
        self.draw_polyline(target, &points, width * scale, color);
    }

    fn draw_sticker(&self, target: &mut RgbaImage, sticker: &Sticker, scale: f64) -> RenderResult<()> {
        let source = self
            .assets
            .get(&sticker.image)
            .ok_or_else(|| RendererError::MissingAsset(sticker.image.clone()))?;
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 {
            return Ok(());
        }

        let to_pixels = Affine::scale(scale) * sticker.transform();
        if to_pixels.determinant().abs() < f64::EPSILON {
            return Ok(());
        }
        let to_unit = to_pixels.inverse();
        let Some(region) = clip_to_image(to_pixels.transform_rect_bbox(Rect::new(0.0, 0.0, 1.0, 1.0)), target)
        else {
            return Ok(());
        };

        // Fit the image inside the unit square, preserving aspect ratio.
        let fit = 1.0 / src_w.max(src_h) as f64;
        let extent = Vec2::new(src_w as f64 * fit, src_h as f64 * fit);
        let offset = Vec2::new((1.0 - extent.x) / 2.0, (1.0 - extent.y) / 2.0);

        for y in region.y0..region.y1 {
            for x in region.x0..region.x1 {
                let unit = to_unit * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let local = unit - offset;
                if local.x < 0.0 || local.y < 0.0 || local.x >= extent.x || local.y >= extent.y {
                    continue;
                }
                let sx = ((local.x / extent.x) * src_w as f64) as u32;
                let sy = ((local.y / extent.y) * src_h as f64) as u32;
                let texel = source.get_pixel(sx.min(src_w - 1), sy.min(src_h - 1)).0;
                blend_pixel(target, x, y, texel, 1.0);
            }
        }
        Ok(())
    }
}

impl Renderer for RasterRenderer<'_> {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage> {
        let (width, height) = ctx.pixel_size()?;
        let mut target = RgbaImage::from_pixel(width, height, Rgba(color_to_rgba8(ctx.background_color)));
        let scale = ctx.scale_factor;

        for stroke in &ctx.scene.strokes {
            self.draw_path(&mut target, &stroke.d, stroke.width, stroke.color.to_rgba8(), scale);
        }

        if let Some((path, brush)) = ctx.preview {
            self.draw_path(&mut target, path, brush.width, brush.color.to_rgba8(), scale);
        }

        for sticker in &ctx.scene.stickers {
            self.draw_sticker(&mut target, sticker, scale)?;
        }

        log::debug!(
            "Rasterized {} strokes and {} stickers at {}x{}",
            ctx.scene.strokes.len(),
            ctx.scene.stickers.len(),
            width,
            height
        );
        Ok(target)
    }
}

/// Integer pixel region, half-open.
#[derive(Debug, Clone, Copy)]
struct PixelRegion {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelRegion {
    fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

fn clip_to_image(rect: Rect, image: &RgbaImage) -> Option<PixelRegion> {
    let (w, h) = image.dimensions();
    if !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()) {
        return None;
    }
    let x0 = rect.x0.floor().clamp(0.0, w as f64) as u32;
    let y0 = rect.y0.floor().clamp(0.0, h as f64) as u32;
    let x1 = rect.x1.ceil().clamp(0.0, w as f64) as u32;
    let y1 = rect.y1.ceil().clamp(0.0, h as f64) as u32;
    (x1 > x0 && y1 > y0).then_some(PixelRegion { x0, y0, x1, y1 })
}

/// Distance from `p` to the segment `ab`. Degenerate segments measure to `a`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return (p - a).hypot();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot()
}

/// Source-over blend of a straight-alpha color into the target pixel.
fn blend_pixel(target: &mut RgbaImage, x: u32, y: u32, src: [u8; 4], coverage: f32) {
    let sa = (src[3] as f32 / 255.0) * coverage;
    if sa <= 0.0 {
        return;
    }
    let dst = target.get_pixel_mut(x, y);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for i in 0..3 {
        let s = src[i] as f32;
        let d = dst[i] as f32;
        dst[i] = ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

pub(crate) fn color_to_rgba8(color: Color) -> [u8; 4] {
    let rgba = color.to_rgba8();
    [rgba.r, rgba.g, rgba.b, rgba.a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use artfolio_core::shapes::BrushColor;
    use artfolio_core::tools::Brush;
    use artfolio_core::{CanvasScene, Stroke};
    use kurbo::Size;

    const RED: BrushColor = BrushColor { hue: 0.0, lightness: 50.0 };
    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn scene(strokes: Vec<Stroke>, stickers: Vec<Sticker>) -> CanvasScene {
        CanvasScene {
            size: Size::new(40.0, 30.0),
            strokes,
            stickers,
        }
    }

    fn line(from: (f64, f64), to: (f64, f64), width: f64) -> Stroke {
        let mut d = PathData::move_to(Point::new(from.0, from.1));
        d.line_to(Point::new(to.0, to.1));
        Stroke::new(d, RED, width)
    }

    #[test]
    fn test_blank_scene_is_background() {
        let assets = StickerAssets::new();
        let scene = scene(vec![], vec![]);
        let img = RasterRenderer::new(&assets).render(&RenderContext::new(&scene)).unwrap();

        assert_eq!(img.dimensions(), (40, 30));
        assert!(img.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_stroke_paints_along_path() {
        let assets = StickerAssets::new();
        let scene = scene(vec![line((5.0, 15.0), (35.0, 15.0), 4.0)], vec![]);
        let img = RasterRenderer::new(&assets).render(&RenderContext::new(&scene)).unwrap();

        assert_eq!(img.get_pixel(20, 15).0, RED.to_rgba8());
        assert_eq!(img.get_pixel(20, 2).0, WHITE);
        // Round cap extends past the end point by the radius.
        assert_eq!(img.get_pixel(3, 15).0[1], img.get_pixel(3, 15).0[2]);
        assert!(img.get_pixel(3, 15).0[1] < 255);
    }

    #[test]
    fn test_single_point_stroke_is_a_dot() {
        let assets = StickerAssets::new();
        let d = PathData::move_to(Point::new(10.0, 10.0));
        let scene = scene(vec![Stroke::new(d, RED, 6.0)], vec![]);
        let img = RasterRenderer::new(&assets).render(&RenderContext::new(&scene)).unwrap();

        assert_eq!(img.get_pixel(10, 10).0, RED.to_rgba8());
        assert_eq!(img.get_pixel(20, 10).0, WHITE);
    }

    #[test]
    fn test_preview_drawn() {
        let assets = StickerAssets::new();
        let scene = scene(vec![], vec![]);
        let mut d = PathData::move_to(Point::new(0.0, 5.0));
        d.line_to(Point::new(40.0, 5.0));
        let brush = Brush { color: RED, width: 4.0 };
        let ctx = RenderContext::new(&scene).with_preview(Some((&d, &brush)));
        let img = RasterRenderer::new(&assets).render(&ctx).unwrap();

        assert_eq!(img.get_pixel(20, 5).0, RED.to_rgba8());
    }

    #[test]
    fn test_sticker_drawn_over_strokes() {
        let mut assets = StickerAssets::new();
        assets.insert("sun", RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255])));
        let sticker = Sticker::new("sun", Point::new(10.0, 5.0), 20.0);
        let scene = scene(vec![line((0.0, 15.0), (40.0, 15.0), 4.0)], vec![sticker]);
        let img = RasterRenderer::new(&assets).render(&RenderContext::new(&scene)).unwrap();

        assert_eq!(img.get_pixel(20, 15).0, BLUE);
        assert_eq!(img.get_pixel(35, 15).0, RED.to_rgba8());
        assert_eq!(img.get_pixel(5, 5).0, WHITE);
    }

    #[test]
    fn test_sticker_scale_and_rotation() {
        let mut assets = StickerAssets::new();
        assets.insert("sun", RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255])));
        let mut sticker = Sticker::new("sun", Point::new(15.0, 10.0), 10.0);
        sticker.scale = 2.0;
        sticker.rotation = std::f64::consts::FRAC_PI_4;
        let scene = scene(vec![], vec![sticker]);
        let img = RasterRenderer::new(&assets).render(&RenderContext::new(&scene)).unwrap();

        // Center stays put, the rotated diamond reaches ~14px out along the axes.
        assert_eq!(img.get_pixel(20, 15).0, BLUE);
        assert_eq!(img.get_pixel(32, 15).0, BLUE);
        // Corners of the unrotated 20px square are now outside.
        assert_eq!(img.get_pixel(11, 6).0, WHITE);
    }

    #[test]
    fn test_sticker_off_canvas_is_clipped() {
        let mut assets = StickerAssets::new();
        assets.insert("sun", RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255])));
        let scene = scene(vec![], vec![Sticker::new("sun", Point::new(-200.0, 500.0), 50.0)]);
        let img = RasterRenderer::new(&assets).render(&RenderContext::new(&scene)).unwrap();

        assert!(img.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_missing_asset_errors() {
        let assets = StickerAssets::new();
        let scene = scene(vec![], vec![Sticker::new("moon", Point::ZERO, 10.0)]);
        let result = RasterRenderer::new(&assets).render(&RenderContext::new(&scene));

        assert!(matches!(result, Err(RendererError::MissingAsset(name)) if name == "moon"));
    }

    #[test]
    fn test_scale_factor_doubles_output() {
        let assets = StickerAssets::new();
        let scene = scene(vec![line((5.0, 15.0), (35.0, 15.0), 4.0)], vec![]);
        let ctx = RenderContext::new(&scene).with_scale_factor(2.0);
        let img = RasterRenderer::new(&assets).render(&ctx).unwrap();

        assert_eq!(img.dimensions(), (80, 60));
        assert_eq!(img.get_pixel(40, 30).0, RED.to_rgba8());
    }

    #[test]
    fn test_invalid_size() {
        let assets = StickerAssets::new();
        let mut scene = scene(vec![], vec![]);
        scene.size = Size::new(0.0, 10.0);
        let result = RasterRenderer::new(&assets).render(&RenderContext::new(&scene));
        assert!(matches!(result, Err(RendererError::InvalidSize { .. })));
    }

    #[test]
    fn test_oversize_scene_is_rejected_before_allocating() {
        let assets = StickerAssets::new();
        let mut scene = scene(vec![], vec![]);
        scene.size = Size::new(4_000_000_000.0, 4_000_000_000.0);
        let result = RasterRenderer::new(&assets).render(&RenderContext::new(&scene));
        assert!(matches!(result, Err(RendererError::InvalidSize { .. })));

        // Each side fits, the area does not.
        scene.size = Size::new(8192.0, 8192.0);
        let ctx = RenderContext::new(&scene).with_scale_factor(2.0);
        assert!(matches!(ctx.pixel_size(), Err(RendererError::InvalidSize { .. })));
        assert_eq!(RenderContext::new(&scene).pixel_size().unwrap(), (8192, 8192));
    }
}
