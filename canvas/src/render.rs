//! Rendering: draws the board to a 2D context.
//!
//! Everything that draws goes through [`web_sys::CanvasRenderingContext2d`]
//! here and nowhere else. Board, camera and UI state are only read.
//!
//! Layers, bottom to top: background and dotted grid, group frames, images,
//! notes, selection outlines and handles, alignment guides, marquee.
//! Images are drawn as placeholder tiles; decoding bitmaps is left to the host.
//!
//! ERROR HANDLING
//! ==============
//! Failing context calls bubble up as `JsValue` to [`crate::engine::Engine::render`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::consts::{GROUP_HEADER_HEIGHT, HANDLE_RADIUS_PX};
use crate::doc::{Board, ImageItem, LayoutDirection, Note, note_text_color};
use crate::geom::Rect;
use crate::guides::{Guide, GuideAxis};
use crate::hit::{ResizeAnchor, handle_position};
use crate::input::UiState;
use crate::layout::{group_frames, group_header};

const BACKGROUND: &str = "#F9FAFB";
const GRID_DOT: &str = "#D1D5DB";
const SELECTION: &str = "#3B82F6";
const GUIDE_VERTICAL: &str = "#EF4444";
const GUIDE_HORIZONTAL: &str = "#3B82F6";

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;
/// Grid dots closer than this many screen pixels are not drawn.
const MIN_GRID_SPACING_PX: f64 = 6.0;
const NOTE_FONT_SIZE: f64 = 14.0;
const NOTE_TEXT_INSET: f64 = 12.0;

/// Draw the full scene.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    board: &Board,
    camera: &Camera,
    ui: &UiState,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear, background and grid in screen space.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, viewport_w, viewport_h);
    if ui.snap_to_grid {
        draw_grid(ctx, camera, ui.grid_size, viewport_w, viewport_h);
    }

    // Everything below is in canvas space.
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: group frames.
    for (id, frame) in group_frames(board) {
        if let Some(group) = board.group(&id) {
            draw_group_frame(ctx, frame, &group.name, group.layout_direction, camera.zoom)?;
        }
    }

    // Layer 3: items. Notes sit above images.
    for image in &board.images {
        draw_image_tile(ctx, image, camera.zoom);
    }
    for note in &board.notes {
        draw_note(ctx, note)?;
    }

    // Layer 4: selection UI.
    let show_handles = ui.selection.len() == 1;
    for id in ui.selection.iter() {
        if let Some(rect) = board.item_rect(id) {
            draw_selection(ctx, rect, camera.zoom, show_handles);
        }
    }

    // Layer 5: transient overlays.
    let visible = visible_world_rect(camera, viewport_w, viewport_h);
    for guide in &ui.guides {
        draw_guide(ctx, guide, visible, camera.zoom);
    }
    if let Some(m) = ui.marquee {
        draw_marquee(ctx, m, camera.zoom)?;
    }

    Ok(())
}

// =============================================================
// Background
// =============================================================

fn draw_grid(ctx: &CanvasRenderingContext2d, camera: &Camera, grid: f64, viewport_w: f64, viewport_h: f64) {
    let spacing = grid * camera.zoom;
    if spacing < MIN_GRID_SPACING_PX {
        return;
    }
    let dot = (camera.zoom).clamp(1.0, 2.0);
    let start_x = camera.pan_x.rem_euclid(spacing);
    let start_y = camera.pan_y.rem_euclid(spacing);

    ctx.set_fill_style_str(GRID_DOT);
    let mut y = start_y;
    while y <= viewport_h {
        let mut x = start_x;
        while x <= viewport_w {
            ctx.fill_rect(x - dot * 0.5, y - dot * 0.5, dot, dot);
            x += spacing;
        }
        y += spacing;
    }
}

fn visible_world_rect(camera: &Camera, viewport_w: f64, viewport_h: f64) -> Rect {
    let a = camera.screen_to_world(Point::new(0.0, 0.0));
    let b = camera.screen_to_world(Point::new(viewport_w, viewport_h));
    Rect::from_corners(a, b)
}

// =============================================================
// Groups
// =============================================================

fn draw_group_frame(
    ctx: &CanvasRenderingContext2d,
    frame: Rect,
    name: &str,
    direction: LayoutDirection,
    zoom: f64,
) -> Result<(), JsValue> {
    ctx.save();

    ctx.set_fill_style_str("rgba(99, 102, 241, 0.05)");
    ctx.fill_rect(frame.x, frame.y, frame.width, frame.height);

    let header = group_header(frame);
    ctx.set_fill_style_str("rgba(99, 102, 241, 0.12)");
    ctx.fill_rect(header.x, header.y, header.width, header.height);

    ctx.set_stroke_style_str("#A5B4FC");
    ctx.set_line_width(2.0 / zoom);
    set_dash(ctx, SELECTION_DASH_PX * 2.0 / zoom)?;
    ctx.stroke_rect(frame.x, frame.y, frame.width, frame.height);
    ctx.set_line_dash(&js_sys::Array::new())?;

    let arrow = match direction {
        LayoutDirection::Horizontal => "→",
        LayoutDirection::Vertical => "↓",
    };
    ctx.set_fill_style_str("#4338CA");
    ctx.set_font("600 14px sans-serif");
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    let label = fit_with_ellipsis(&format!("{name} {arrow}"), (header.width - 24.0).max(1.0), |t| text_width(ctx, t));
    ctx.fill_text(&label, header.x + 12.0, header.y + GROUP_HEADER_HEIGHT * 0.5)?;

    ctx.restore();
    Ok(())
}

// =============================================================
// Items
// =============================================================

fn draw_image_tile(ctx: &CanvasRenderingContext2d, image: &ImageItem, zoom: f64) {
    let r = image.rect();
    ctx.save();
    ctx.set_fill_style_str("#E5E7EB");
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.set_stroke_style_str("#D1D5DB");
    ctx.set_line_width(1.0 / zoom);
    ctx.stroke_rect(r.x, r.y, r.width, r.height);

    // Diagonal cross marks the tile as an image placeholder.
    ctx.begin_path();
    ctx.move_to(r.left(), r.top());
    ctx.line_to(r.right(), r.bottom());
    ctx.move_to(r.right(), r.top());
    ctx.line_to(r.left(), r.bottom());
    ctx.stroke();
    ctx.restore();
}

fn draw_note(ctx: &CanvasRenderingContext2d, note: &Note) -> Result<(), JsValue> {
    let r = note.rect();
    ctx.save();
    ctx.set_shadow_color("rgba(0, 0, 0, 0.12)");
    ctx.set_shadow_blur(8.0);
    ctx.set_shadow_offset_y(2.0);
    ctx.set_fill_style_str(&note.color);
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.set_shadow_color("transparent");

    if !note.text.is_empty() {
        ctx.set_fill_style_str(note_text_color(&note.color));
        ctx.set_font(&format!("{NOTE_FONT_SIZE}px sans-serif"));
        ctx.set_text_align("left");
        ctx.set_text_baseline("top");

        let max_w = (r.width - NOTE_TEXT_INSET * 2.0).max(1.0);
        let line_height = NOTE_FONT_SIZE * 1.4;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_lines = ((r.height - NOTE_TEXT_INSET * 2.0) / line_height).floor().max(1.0) as usize;
        let lines = wrap_note_text(&note.text, max_w, max_lines, |t| text_width(ctx, t));
        let mut y = r.y + NOTE_TEXT_INSET;
        for line in &lines {
            ctx.fill_text(line, r.x + NOTE_TEXT_INSET, y)?;
            y += line_height;
        }
    }

    ctx.restore();
    Ok(())
}

/// Word-wrap `text` into at most `max_lines` lines no wider than `max_w`.
///
/// Words wider than a line are split by character. When the text does not
/// fit, the last kept line is shortened and ends in `...`.
pub(crate) fn wrap_note_text<F>(text: &str, max_w: f64, max_lines: usize, width_of: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let joined = if line.is_empty() { word.to_owned() } else { format!("{line} {word}") };
            if width_of(&joined) <= max_w {
                line = joined;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for ch in word.chars() {
                line.push(ch);
                if line.chars().count() > 1 && width_of(&line) > max_w {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, ch.to_string()));
                }
            }
        }
        lines.push(line);
    }

    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        *last = fit_with_ellipsis(&format!("{}...", last.trim_end()), max_w, &width_of);
    }
    lines
}

/// `text` if it fits in `max_w`, otherwise its longest prefix that fits once
/// `...` is appended. An existing trailing `...` is not doubled.
pub(crate) fn fit_with_ellipsis<F>(text: &str, max_w: f64, width_of: F) -> String
where
    F: Fn(&str) -> f64,
{
    let text = text.trim();
    if width_of(text) <= max_w {
        return text.to_owned();
    }
    let mut kept = text.trim_end_matches('.').trim_end().to_owned();
    while !kept.is_empty() {
        let candidate = format!("{kept}...");
        if width_of(&candidate) <= max_w {
            return candidate;
        }
        kept.pop();
        kept.truncate(kept.trim_end().len());
    }
    "...".to_owned()
}

fn text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    ctx.measure_text(text).map_or(f64::INFINITY, |m| m.width())
}

// =============================================================
// Selection and overlays
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, rect: Rect, zoom: f64, show_handles: bool) {
    ctx.save();
    ctx.set_stroke_style_str(SELECTION);
    ctx.set_line_width(2.0 / zoom);
    let outline = rect.inflate(2.0 / zoom);
    ctx.stroke_rect(outline.x, outline.y, outline.width, outline.height);

    if show_handles {
        let half = HANDLE_RADIUS_PX * 0.5 / zoom;
        ctx.set_fill_style_str("#FFFFFF");
        ctx.set_line_width(1.0 / zoom);
        for anchor in ResizeAnchor::ALL {
            let p = handle_position(&rect, anchor);
            ctx.fill_rect(p.x - half, p.y - half, half * 2.0, half * 2.0);
            ctx.stroke_rect(p.x - half, p.y - half, half * 2.0, half * 2.0);
        }
    }
    ctx.restore();
}

fn draw_guide(ctx: &CanvasRenderingContext2d, guide: &Guide, visible: Rect, zoom: f64) {
    ctx.save();
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    match guide.axis {
        GuideAxis::Vertical => {
            ctx.set_stroke_style_str(GUIDE_VERTICAL);
            ctx.move_to(guide.position, visible.top());
            ctx.line_to(guide.position, visible.bottom());
        }
        GuideAxis::Horizontal => {
            ctx.set_stroke_style_str(GUIDE_HORIZONTAL);
            ctx.move_to(visible.left(), guide.position);
            ctx.line_to(visible.right(), guide.position);
        }
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: Rect, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    ctx.set_stroke_style_str(SELECTION);
    ctx.set_fill_style_str("rgba(59, 130, 246, 0.1)");
    ctx.set_line_width(1.0 / zoom);
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

fn set_dash(ctx: &CanvasRenderingContext2d, segment: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&segment.into());
    dash_array.push(&segment.into());
    ctx.set_line_dash(&dash_array)
}
