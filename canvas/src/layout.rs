//! Group layout: sequential flow of members, bounds and frame geometry.
//!
//! A group flows its members from `(x + padding, y + padding)` along its
//! axis, advancing by each member's extent plus `gap`. The cross-axis
//! coordinate stays at the padded anchor. Flow runs on group creation, axis
//! or gap changes and member removal; translating a group moves everything
//! by the same delta without re-flowing.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::camera::Point;
use crate::consts::{GROUP_FRAME_PADDING, GROUP_HEADER_HEIGHT};
use crate::doc::{Board, Group, LayoutDirection};
use crate::geom::{Rect, bounding_box};

/// Positions for members of the given sizes, in order.
#[must_use]
pub fn flow_positions(group: &Group, sizes: &[(f64, f64)]) -> Vec<Point> {
    let start_x = group.x + group.padding;
    let start_y = group.y + group.padding;
    let mut cursor = match group.layout_direction {
        LayoutDirection::Horizontal => start_x,
        LayoutDirection::Vertical => start_y,
    };
    sizes
        .iter()
        .map(|&(width, height)| match group.layout_direction {
            LayoutDirection::Horizontal => {
                let pt = Point::new(cursor, start_y);
                cursor += width + group.gap;
                pt
            }
            LayoutDirection::Vertical => {
                let pt = Point::new(start_x, cursor);
                cursor += height + group.gap;
                pt
            }
        })
        .collect()
}

/// Re-run the flow for one group. Non-members are untouched.
///
/// Member ids with no matching item are skipped and take no space.
pub fn arrange(board: &mut Board, group_id: &str) -> bool {
    let Some(group) = board.group(group_id).cloned() else {
        return false;
    };
    let members: Vec<(String, Rect)> = group
        .image_ids
        .iter()
        .filter_map(|id| board.item_rect(id).map(|r| (id.clone(), r)))
        .collect();
    let sizes: Vec<(f64, f64)> = members.iter().map(|(_, r)| (r.width, r.height)).collect();
    for ((id, _), pt) in members.iter().zip(flow_positions(&group, &sizes)) {
        board.set_item_position(id, pt.x, pt.y);
    }
    true
}

/// Move a group's anchor and every member by the same delta.
pub fn translate_group(board: &mut Board, group_id: &str, dx: f64, dy: f64) -> bool {
    let Some(group) = board.group_mut(group_id) else {
        return false;
    };
    group.x += dx;
    group.y += dy;
    let members = group.image_ids.clone();
    for id in &members {
        if let Some(r) = board.item_rect(id) {
            board.set_item_position(id, r.x + dx, r.y + dy);
        }
    }
    true
}

/// Bounding box of a group's existing members; `None` when it has none.
#[must_use]
pub fn group_bounds(group: &Group, board: &Board) -> Option<Rect> {
    bounding_box(group.image_ids.iter().filter_map(|id| board.item_rect(id)))
}

/// Frame drawn around a group: padded member bounds plus a header band above.
#[must_use]
pub fn group_frame(bounds: Rect) -> Rect {
    Rect::new(
        bounds.x - GROUP_FRAME_PADDING,
        bounds.y - GROUP_FRAME_PADDING - GROUP_HEADER_HEIGHT,
        bounds.width + GROUP_FRAME_PADDING * 2.0,
        bounds.height + GROUP_FRAME_PADDING * 2.0 + GROUP_HEADER_HEIGHT,
    )
}

/// Header band of a group frame, used for hit-testing group drags.
#[must_use]
pub fn group_header(frame: Rect) -> Rect {
    Rect::new(frame.x, frame.y, frame.width, GROUP_HEADER_HEIGHT)
}

/// Frames of all renderable (non-empty) groups, in board order.
#[must_use]
pub fn group_frames(board: &Board) -> Vec<(String, Rect)> {
    board
        .groups
        .iter()
        .filter_map(|g| group_bounds(g, board).map(|b| (g.id.clone(), group_frame(b))))
        .collect()
}
