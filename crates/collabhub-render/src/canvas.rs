//! Scene rasterization.
//!
//! The picture is a 20-inch-wide figure: the pixel width fixes the DPI, and
//! marker areas and font sizes (given in points) scale with it. Layout
//! coordinates are fitted to the drawing area with a 5% margin per side, each
//! axis scaled independently, y pointing up. The institution legend sits in
//! the upper-right corner of the plot area.

use std::path::PathBuf;

use ab_glyph::{FontArc, PxScale};
use collabhub_core::config::RenderConfig;
use collabhub_triage::layout::Position;
use collabhub_triage::style::{
    BLACK, Color, LEGEND_FONT_SIZE, LEGEND_TITLE, LIGHT_GRAY, LegendEntry, REGULAR_NODE_SIZE,
    RenderScene, SceneLabel, TITLE_FONT_SIZE, WHITE,
};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    Blend, Canvas, draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut,
    draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;

const FIGURE_WIDTH_INCHES: f64 = 20.0;
const POINTS_PER_INCH: f64 = 72.0;
const MARGIN_FRACTION: f64 = 0.05;
const SIDE_PADDING_PX: f64 = 20.0;
/// Rough advance width per character, in ems, when no font is loaded.
const FALLBACK_CHAR_WIDTH: f64 = 0.6;
/// Legend row height and inner padding, in ems.
const LEGEND_ROW_EMS: f64 = 1.5;
const LEGEND_PAD_EMS: f64 = 0.5;
const LEGEND_BOX_ALPHA: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            font_path: config.font_path.clone(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rgba(color: Color) -> Rgba<u8> {
    let alpha = (color.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([color.r, color.g, color.b, alpha])
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Maps layout space onto the pixel drawing area.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    min: Position,
    max: Position,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    dpi: f64,
}

impl Viewport {
    fn fit(scene: &RenderScene, width: u32, height: u32, title_px: f64) -> Self {
        let points = scene
            .nodes
            .iter()
            .map(|n| n.position)
            .chain(scene.labels.iter().map(|l| l.anchor))
            .chain(scene.edges.iter().flat_map(|e| [e.from, e.to]));

        let (mut min, mut max) = points.fold(
            (
                Position::new(f64::INFINITY, f64::INFINITY),
                Position::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), p| {
                (
                    Position::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Position::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        );

        if !min.x.is_finite() {
            min = Position::new(-1.0, -1.0);
            max = Position::new(1.0, 1.0);
        }
        let (lo_x, hi_x) = pad_range(min.x, max.x);
        let (lo_y, hi_y) = pad_range(min.y, max.y);

        let width_px = f64::from(width);
        let height_px = f64::from(height);
        let top = title_px.mul_add(2.0, SIDE_PADDING_PX);

        Self {
            min: Position::new(lo_x, lo_y),
            max: Position::new(hi_x, hi_y),
            left: SIDE_PADDING_PX,
            top,
            width: 2.0f64.mul_add(-SIDE_PADDING_PX, width_px).max(1.0),
            height: (height_px - top - SIDE_PADDING_PX).max(1.0),
            dpi: width_px / FIGURE_WIDTH_INCHES,
        }
    }

    fn to_pixel(&self, p: Position) -> (f64, f64) {
        let fx = (p.x - self.min.x) / (self.max.x - self.min.x);
        let fy = (p.y - self.min.y) / (self.max.y - self.min.y);
        (
            fx.mul_add(self.width, self.left),
            (1.0 - fy).mul_add(self.height, self.top),
        )
    }

    fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi / POINTS_PER_INCH
    }
}

fn pad_range(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    (
        span.mul_add(-MARGIN_FRACTION, lo),
        span.mul_add(MARGIN_FRACTION, hi),
    )
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw `scene` onto a fresh white canvas of `width` × `height` pixels.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn draw_scene(scene: &RenderScene, width: u32, height: u32, font: Option<&FontArc>) -> RgbaImage {
    let dpi = f64::from(width) / FIGURE_WIDTH_INCHES;
    let title_px = TITLE_FONT_SIZE * dpi / POINTS_PER_INCH;
    let view = Viewport::fit(scene, width, height, title_px);

    let mut canvas = Blend(RgbaImage::from_pixel(width, height, rgba(WHITE)));

    if let Some(edge_color) = scene.edge_color {
        let color = rgba(edge_color);
        for edge in &scene.edges {
            let (x1, y1) = view.to_pixel(edge.from);
            let (x2, y2) = view.to_pixel(edge.to);
            draw_line_segment_mut(
                &mut canvas,
                (x1 as f32, y1 as f32),
                (x2 as f32, y2 as f32),
                color,
            );
        }
    }

    for node in &scene.nodes {
        let (x, y) = view.to_pixel(node.position);
        let center = (x.round() as i32, y.round() as i32);
        let radius = (view.points_to_px(node.size.max(0.0).sqrt()) / 2.0)
            .round()
            .max(1.0) as i32;
        draw_filled_circle_mut(&mut canvas, center, radius, rgba(node.fill));
        if let Some(outline) = node.outline {
            draw_hollow_circle_mut(&mut canvas, center, radius, rgba(outline));
        }
    }

    for label in &scene.labels {
        draw_label(&mut canvas, &view, label, font);
    }

    if !scene.legend.is_empty() {
        let geo = LegendGeometry::new(&view, &scene.legend, font);
        draw_legend(&mut canvas, &geo, &scene.legend, font);
    }

    if let Some(font) = font {
        let (w, _) = text_size(PxScale::from(title_px as f32), font, &scene.title);
        let x = (f64::from(width) - f64::from(w)) / 2.0;
        draw_text_mut(
            &mut canvas,
            rgba(BLACK),
            x.round() as i32,
            (title_px / 2.0).round() as i32,
            PxScale::from(title_px as f32),
            font,
            &scene.title,
        );
    }

    canvas.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn draw_label<C>(canvas: &mut C, view: &Viewport, label: &SceneLabel, font: Option<&FontArc>)
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    let font_px = view.points_to_px(label.style.font_size);
    let scale = PxScale::from(font_px as f32);

    let (text_w, text_h) = font.map_or_else(
        || {
            let chars = label.text.chars().count() as f64;
            (chars * FALLBACK_CHAR_WIDTH * font_px, font_px)
        },
        |font| {
            let (w, h) = text_size(scale, font, &label.text);
            (f64::from(w), f64::from(h))
        },
    );

    let pad = label.style.pad * font_px;
    let (ax, ay) = view.to_pixel(label.anchor);
    let box_w = 2.0f64.mul_add(pad, text_w).max(1.0);
    let box_h = 2.0f64.mul_add(pad, text_h).max(1.0);
    let box_left = ax - box_w / 2.0;
    let box_top = ay - box_h;

    let rect = Rect::at(box_left.round() as i32, box_top.round() as i32)
        .of_size(box_w.round() as u32, box_h.round() as u32);
    draw_filled_rect_mut(canvas, rect, rgba(WHITE.with_alpha(label.style.box_alpha)));
    draw_hollow_rect_mut(canvas, rect, rgba(label.style.edge_color));

    if let Some(font) = font {
        draw_text_mut(
            canvas,
            rgba(BLACK),
            (box_left + pad).round() as i32,
            (box_top + pad).round() as i32,
            scale,
            font,
            &label.text,
        );
    }
}

/// Width of `text` in pixels, estimated when no font is loaded.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn measure(text: &str, font_px: f64, font: Option<&FontArc>) -> f64 {
    font.map_or_else(
        || text.chars().count() as f64 * FALLBACK_CHAR_WIDTH * font_px,
        |font| f64::from(text_size(PxScale::from(font_px as f32), font, text).0),
    )
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// Pixel placement of the legend box: a title row, then one row per entry
/// with a swatch on the left and the institution name beside it.
#[derive(Debug, Clone, Copy)]
struct LegendGeometry {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    font_px: f64,
    pad: f64,
    row: f64,
    marker_radius: f64,
}

impl LegendGeometry {
    fn new(view: &Viewport, legend: &[LegendEntry], font: Option<&FontArc>) -> Self {
        let font_px = view.points_to_px(LEGEND_FONT_SIZE);
        let pad = LEGEND_PAD_EMS * font_px;
        let row = LEGEND_ROW_EMS * font_px;
        let marker_radius = (view.points_to_px(REGULAR_NODE_SIZE.sqrt()) / 2.0).max(1.0);

        let swatch = 2.0f64.mul_add(marker_radius, pad);
        let widest = legend
            .iter()
            .map(|e| swatch + measure(&e.institution, font_px, font))
            .fold(measure(LEGEND_TITLE, font_px, font), f64::max);

        #[allow(clippy::cast_precision_loss)]
        let rows = (legend.len() + 1) as f64;
        let width = 2.0f64.mul_add(pad, widest);
        let height = rows.mul_add(row, 2.0 * pad);
        Self {
            left: view.left + view.width - width - pad,
            top: view.top + pad,
            width,
            height,
            font_px,
            pad,
            row,
            marker_radius,
        }
    }

    /// Top of row `i`; row 0 is the title.
    #[allow(clippy::cast_precision_loss)]
    fn row_top(&self, i: usize) -> f64 {
        (i as f64).mul_add(self.row, self.top + self.pad)
    }

    fn marker_center(&self, entry: usize) -> (f64, f64) {
        (
            self.left + self.pad + self.marker_radius,
            self.row_top(entry + 1) + self.row / 2.0,
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_legend<C>(
    canvas: &mut C,
    geo: &LegendGeometry,
    legend: &[LegendEntry],
    font: Option<&FontArc>,
) where
    C: Canvas<Pixel = Rgba<u8>>,
{
    let rect = Rect::at(geo.left.round() as i32, geo.top.round() as i32)
        .of_size(geo.width.round().max(1.0) as u32, geo.height.round().max(1.0) as u32);
    draw_filled_rect_mut(canvas, rect, rgba(WHITE.with_alpha(LEGEND_BOX_ALPHA)));
    draw_hollow_rect_mut(canvas, rect, rgba(LIGHT_GRAY));

    let scale = PxScale::from(geo.font_px as f32);
    let text_left = geo.left + geo.pad;
    if let Some(font) = font {
        let title_w = measure(LEGEND_TITLE, geo.font_px, Some(font));
        let x = geo.left + (geo.width - title_w) / 2.0;
        draw_text_mut(
            canvas,
            rgba(BLACK),
            x.round() as i32,
            geo.row_top(0).round() as i32,
            scale,
            font,
            LEGEND_TITLE,
        );
    }

    for (i, entry) in legend.iter().enumerate() {
        let (cx, cy) = geo.marker_center(i);
        let radius = geo.marker_radius.round() as i32;
        let center = (cx.round() as i32, cy.round() as i32);
        draw_filled_circle_mut(canvas, center, radius, rgba(entry.color));

        if let Some(font) = font {
            let x = 2.0f64.mul_add(geo.marker_radius, text_left + geo.pad);
            let y = geo.row_top(i + 1) + (geo.row - geo.font_px) / 2.0;
            draw_text_mut(
                canvas,
                rgba(BLACK),
                x.round() as i32,
                y.round() as i32,
                scale,
                font,
                &entry.institution,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabhub_triage::style::{GOLD, LabelStyle, SceneNode};

    fn single_node_scene(fill: Color) -> RenderScene {
        RenderScene {
            title: "t".to_string(),
            nodes: vec![SceneNode {
                position: Position::ORIGIN,
                size: 300.0,
                fill,
                outline: None,
            }],
            ..RenderScene::default()
        }
    }

    #[test]
    fn empty_scene_is_blank_white() {
        let img = draw_scene(&RenderScene::default(), 100, 80, None);
        assert_eq!(img.dimensions(), (100, 80));
        assert!(img.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn lone_node_is_drawn_in_the_middle_of_the_plot() {
        let img = draw_scene(&single_node_scene(GOLD), 400, 400, None);
        let view = Viewport::fit(&single_node_scene(GOLD), 400, 400, 400.0 / 20.0 * 18.0 / 72.0);
        let (x, y) = view.to_pixel(Position::ORIGIN);
        let pixel = img.get_pixel(x.round() as u32, y.round() as u32);
        assert_eq!(*pixel, Rgba([0xff, 0xd7, 0x00, 0xff]));
    }

    #[test]
    fn translucent_fill_blends_with_background() {
        let fill = Color::rgb(0, 0, 0).with_alpha(0.5);
        let scene = single_node_scene(fill);
        let img = draw_scene(&scene, 400, 400, None);
        let view = Viewport::fit(&scene, 400, 400, 400.0 / 20.0 * 18.0 / 72.0);
        let (x, y) = view.to_pixel(Position::ORIGIN);
        let pixel = img.get_pixel(x.round() as u32, y.round() as u32);
        assert!(pixel[0] > 100 && pixel[0] < 160, "{pixel:?}");
    }

    #[test]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn legend_swatches_sit_in_the_upper_right() {
        let red = Color::rgb(0xff, 0, 0);
        let scene = RenderScene {
            legend: vec![
                LegendEntry { institution: "Lab A".to_string(), color: red },
                LegendEntry { institution: "Lab B".to_string(), color: BLACK },
            ],
            ..single_node_scene(GOLD)
        };
        let img = draw_scene(&scene, 800, 720, None);
        let view = Viewport::fit(&scene, 800, 720, 800.0 / 20.0 * 18.0 / 72.0);
        let geo = LegendGeometry::new(&view, &scene.legend, None);

        assert!(geo.left > f64::from(800u32) / 2.0);
        let (x, y) = geo.marker_center(0);
        assert_eq!(*img.get_pixel(x.round() as u32, y.round() as u32), Rgba([0xff, 0, 0, 0xff]));
        let (x, y) = geo.marker_center(1);
        assert_eq!(*img.get_pixel(x.round() as u32, y.round() as u32), Rgba([0, 0, 0, 0xff]));
    }

    #[test]
    fn y_axis_points_up() {
        let scene = RenderScene {
            nodes: vec![
                SceneNode {
                    position: Position::new(0.0, 1.0),
                    size: 20.0,
                    fill: BLACK,
                    outline: None,
                },
                SceneNode {
                    position: Position::new(0.0, -1.0),
                    size: 20.0,
                    fill: BLACK,
                    outline: None,
                },
            ],
            ..RenderScene::default()
        };
        let view = Viewport::fit(&scene, 200, 200, 10.0);
        let (_, top) = view.to_pixel(Position::new(0.0, 1.0));
        let (_, bottom) = view.to_pixel(Position::new(0.0, -1.0));
        assert!(top < bottom);
    }

    #[test]
    fn labels_without_font_still_draw_boxes() {
        let scene = RenderScene {
            labels: vec![SceneLabel {
                anchor: Position::ORIGIN,
                text: "1. Ada".to_string(),
                style: LabelStyle {
                    font_size: 12.0,
                    box_alpha: 1.0,
                    edge_color: BLACK,
                    pad: 0.2,
                },
            }],
            ..RenderScene::default()
        };
        let img = draw_scene(&scene, 400, 400, None);
        assert!(img.pixels().any(|p| *p == Rgba([0, 0, 0, 255])));
    }
}
