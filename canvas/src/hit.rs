//! Hit-testing and resize-handle geometry.
//!
//! Tests run in canvas space. Resize handles of a single selected item are
//! checked first, with a radius fixed in screen pixels so handles stay
//! grabbable at any zoom. Then items are checked topmost first (notes above
//! images, later above earlier), and finally group header bands.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::{HANDLE_RADIUS_PX, IMAGE_MIN_WIDTH, NOTE_MIN_HEIGHT, NOTE_MIN_WIDTH};
use crate::doc::{Board, ItemId, ItemKind};
use crate::geom::{Rect, snap_size};
use crate::layout::{group_frames, group_header};
use crate::selection::Selection;

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::Nw, Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W];

    fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// CSS cursor shown while hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Item { id: ItemId, part: HitPart },
    GroupHeader { id: ItemId },
}

/// Canvas-space position of a handle on `rect`.
#[must_use]
pub fn handle_position(rect: &Rect, anchor: ResizeAnchor) -> Point {
    let x = match anchor {
        ResizeAnchor::W | ResizeAnchor::Nw | ResizeAnchor::Sw => rect.left(),
        ResizeAnchor::E | ResizeAnchor::Ne | ResizeAnchor::Se => rect.right(),
        ResizeAnchor::N | ResizeAnchor::S => rect.center_x(),
    };
    let y = match anchor {
        ResizeAnchor::N | ResizeAnchor::Ne | ResizeAnchor::Nw => rect.top(),
        ResizeAnchor::S | ResizeAnchor::Se | ResizeAnchor::Sw => rect.bottom(),
        ResizeAnchor::E | ResizeAnchor::W => rect.center_y(),
    };
    Point::new(x, y)
}

/// Test what is under `world_pt`.
#[must_use]
pub fn hit_test(world_pt: Point, board: &Board, camera: &Camera, selection: &Selection) -> Option<Hit> {
    if let Some(id) = selection.single()
        && let Some(rect) = board.item_rect(id)
    {
        let radius = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
        for anchor in ResizeAnchor::ALL {
            let h = handle_position(&rect, anchor);
            let (dx, dy) = (world_pt.x - h.x, world_pt.y - h.y);
            if dx * dx + dy * dy <= radius * radius {
                return Some(Hit::Item { id: id.clone(), part: HitPart::ResizeHandle(anchor) });
            }
        }
    }

    let topmost = board
        .notes
        .iter()
        .rev()
        .map(|n| (&n.id, n.rect()))
        .chain(board.images.iter().rev().map(|i| (&i.id, i.rect())));
    for (id, rect) in topmost {
        if rect.contains(world_pt) {
            return Some(Hit::Item { id: id.clone(), part: HitPart::Body });
        }
    }

    group_frames(board)
        .into_iter()
        .rev()
        .find(|(_, frame)| group_header(*frame).contains(world_pt))
        .map(|(id, _)| Hit::GroupHeader { id })
}

/// New geometry for an item dragged by `anchor` from `orig` by `(dx, dy)`.
///
/// Edges opposite the anchor stay fixed. Images keep their aspect ratio and
/// never go below the minimum width; notes are clamped to their minimum
/// width and height. With `grid` set the size is snapped before clamping.
#[must_use]
pub fn resize_rect(orig: Rect, anchor: ResizeAnchor, kind: ItemKind, dx: f64, dy: f64, grid: Option<f64>) -> Rect {
    let mut width = orig.width;
    let mut height = orig.height;
    if anchor.moves_right() {
        width += dx;
    }
    if anchor.moves_left() {
        width -= dx;
    }
    if anchor.moves_bottom() {
        height += dy;
    }
    if anchor.moves_top() {
        height -= dy;
    }

    let snap_dim = |v: f64| grid.map_or(v, |g| snap_size(v, g));
    match kind {
        ItemKind::Image => {
            let aspect = if orig.width > 0.0 { orig.height / orig.width } else { 1.0 };
            // Pure vertical handles drive width through the aspect ratio.
            if !(anchor.moves_left() || anchor.moves_right()) && aspect > 0.0 {
                width = height / aspect;
            }
            width = snap_dim(width).max(IMAGE_MIN_WIDTH);
            height = width * aspect;
        }
        ItemKind::Note => {
            width = snap_dim(width).max(NOTE_MIN_WIDTH);
            height = snap_dim(height).max(NOTE_MIN_HEIGHT);
        }
    }

    let x = if anchor.moves_left() { orig.right() - width } else { orig.x };
    let y = if anchor.moves_top() { orig.bottom() - height } else { orig.y };
    Rect::new(x, y, width, height)
}
