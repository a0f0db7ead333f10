//! Alignment guides shown while dragging.
//!
//! For every static item, five relationships are tested per axis: matching
//! leading edges, matching trailing edges, matching centers, and the two
//! abutting cases (leading-to-trailing, trailing-to-leading). A guide is
//! emitted when the difference is strictly below the threshold, positioned
//! on the static item's edge or center. Guides never move anything.

#[cfg(test)]
#[path = "guides_test.rs"]
mod guides_test;

use serde::Serialize;

use crate::doc::ItemBox;
use crate::geom::Rect;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// A vertical line at some x (compares x-derived edges).
    Vertical,
    /// A horizontal line at some y (compares y-derived edges).
    Horizontal,
}

/// Which relationship produced a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    Left,
    Right,
    Center,
    Top,
    Bottom,
    Middle,
    /// Abutting edges.
    Edge,
}

/// A guide line in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Guide {
    pub axis: GuideAxis,
    pub position: f64,
    pub kind: GuideKind,
}

/// Compute deduplicated guides for `dragged` against `others`.
///
/// Entries of `others` with the dragged item's id are skipped. Guides are
/// unique by `(axis, position)`; the first match wins.
#[must_use]
pub fn compute_guides(dragged: &ItemBox, others: &[ItemBox], threshold: f64) -> Vec<Guide> {
    let mut guides: Vec<Guide> = Vec::new();
    for other in others.iter().filter(|o| o.id != dragged.id) {
        for guide in candidate_guides(&dragged.rect, &other.rect, threshold) {
            let duplicate = guides
                .iter()
                .any(|g| g.axis == guide.axis && g.position == guide.position);
            if !duplicate {
                guides.push(guide);
            }
        }
    }
    guides
}

fn candidate_guides(d: &Rect, o: &Rect, threshold: f64) -> Vec<Guide> {
    let near = |a: f64, b: f64| (a - b).abs() < threshold;
    let vertical = [
        (d.left(), o.left(), o.left(), GuideKind::Left),
        (d.right(), o.right(), o.right(), GuideKind::Right),
        (d.center_x(), o.center_x(), o.center_x(), GuideKind::Center),
        (d.left(), o.right(), o.right(), GuideKind::Edge),
        (d.right(), o.left(), o.left(), GuideKind::Edge),
    ];
    let horizontal = [
        (d.top(), o.top(), o.top(), GuideKind::Top),
        (d.bottom(), o.bottom(), o.bottom(), GuideKind::Bottom),
        (d.center_y(), o.center_y(), o.center_y(), GuideKind::Middle),
        (d.top(), o.bottom(), o.bottom(), GuideKind::Edge),
        (d.bottom(), o.top(), o.top(), GuideKind::Edge),
    ];

    let mut out = Vec::new();
    for (a, b, position, kind) in vertical {
        if near(a, b) {
            out.push(Guide { axis: GuideAxis::Vertical, position, kind });
        }
    }
    for (a, b, position, kind) in horizontal {
        if near(a, b) {
            out.push(Guide { axis: GuideAxis::Horizontal, position, kind });
        }
    }
    out
}
