//! Align and distribute operations over a set of items.
//!
//! Both operations are pure: they take item geometry and return the target
//! top-left position of every item, which the caller commits. Align needs at
//! least two items and distribute at least three; smaller inputs produce no
//! moves.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ItemBox, ItemId};
use crate::geom::snap;

/// Edge or center line to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignEdge {
    Left,
    Right,
    Center,
    Top,
    Bottom,
    Middle,
}

/// Axis along which to distribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

/// A target top-left position for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMove {
    pub id: ItemId,
    pub x: f64,
    pub y: f64,
}

/// Align `items` to one edge or center line.
///
/// With `grid` set, the aligned coordinate is snapped afterwards; the other
/// coordinate is left as is.
#[must_use]
pub fn align(items: &[ItemBox], edge: AlignEdge, grid: Option<f64>) -> Vec<ItemMove> {
    if items.len() < 2 {
        return Vec::new();
    }
    let min_left = fold(items, f64::INFINITY, |acc, b| acc.min(b.rect.left()));
    let max_right = fold(items, f64::NEG_INFINITY, |acc, b| acc.max(b.rect.right()));
    let min_top = fold(items, f64::INFINITY, |acc, b| acc.min(b.rect.top()));
    let max_bottom = fold(items, f64::NEG_INFINITY, |acc, b| acc.max(b.rect.bottom()));
    let mid_x = (min_left + max_right) / 2.0;
    let mid_y = (min_top + max_bottom) / 2.0;
    let finish = |v: f64| grid.map_or(v, |g| snap(v, g));

    items
        .iter()
        .map(|b| {
            let r = b.rect;
            let (x, y) = match edge {
                AlignEdge::Left => (finish(min_left), r.y),
                AlignEdge::Right => (finish(max_right - r.width), r.y),
                AlignEdge::Center => (finish(mid_x - r.width / 2.0), r.y),
                AlignEdge::Top => (r.x, finish(min_top)),
                AlignEdge::Bottom => (r.x, finish(max_bottom - r.height)),
                AlignEdge::Middle => (r.x, finish(mid_y - r.height / 2.0)),
            };
            ItemMove { id: b.id.clone(), x, y }
        })
        .collect()
}

/// Spread `items` so the gaps between consecutive items are equal.
///
/// Items are ordered by their leading coordinate; the first and last stay
/// put and interior items are placed one after another. Overlapping input
/// yields a negative gap, which is kept.
#[must_use]
pub fn distribute(items: &[ItemBox], axis: DistributeAxis) -> Vec<ItemMove> {
    if items.len() < 3 {
        return Vec::new();
    }
    let lead = |b: &ItemBox| match axis {
        DistributeAxis::Horizontal => b.rect.x,
        DistributeAxis::Vertical => b.rect.y,
    };
    let size = |b: &ItemBox| match axis {
        DistributeAxis::Horizontal => b.rect.width,
        DistributeAxis::Vertical => b.rect.height,
    };

    let mut sorted: Vec<&ItemBox> = items.iter().collect();
    sorted.sort_by(|a, b| lead(a).total_cmp(&lead(b)));
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let interior = &sorted[1..sorted.len() - 1];
    let interior_size: f64 = interior.iter().map(|b| size(b)).sum();
    let span = lead(last) - (lead(first) + size(first));
    #[allow(clippy::cast_precision_loss)]
    let gap = (span - interior_size) / (sorted.len() - 1) as f64;

    let mut moves = vec![ItemMove { id: first.id.clone(), x: first.rect.x, y: first.rect.y }];
    let mut cursor = lead(first) + size(first) + gap;
    for b in interior {
        let (x, y) = match axis {
            DistributeAxis::Horizontal => (cursor, b.rect.y),
            DistributeAxis::Vertical => (b.rect.x, cursor),
        };
        moves.push(ItemMove { id: b.id.clone(), x, y });
        cursor += size(b) + gap;
    }
    moves.push(ItemMove { id: last.id.clone(), x: last.rect.x, y: last.rect.y });
    moves
}

fn fold(items: &[ItemBox], init: f64, f: impl Fn(f64, &ItemBox) -> f64) -> f64 {
    items.iter().fold(init, f)
}
