#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Rect edges
// =============================================================

#[test]
fn rect_edges_and_centers() {
    let r = Rect::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(r.left(), 10.0);
    assert_eq!(r.right(), 110.0);
    assert_eq!(r.top(), 20.0);
    assert_eq!(r.bottom(), 70.0);
    assert_eq!(r.center_x(), 60.0);
    assert_eq!(r.center_y(), 45.0);
}

#[test]
fn from_corners_normalizes_direction() {
    let r = Rect::from_corners(pt(60.0, 60.0), pt(0.0, 10.0));
    assert_eq!(r, Rect::new(0.0, 10.0, 60.0, 50.0));
}

#[test]
fn from_corners_same_point_is_point() {
    let r = Rect::from_corners(pt(5.0, 5.0), pt(5.0, 5.0));
    assert!(r.is_point());
}

// =============================================================
// Intersection
// =============================================================

#[test]
fn intersects_overlapping() {
    let a = Rect::new(0.0, 0.0, 50.0, 50.0);
    let b = Rect::new(25.0, 25.0, 50.0, 50.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn intersects_shared_edge_is_inclusive() {
    let a = Rect::new(0.0, 0.0, 50.0, 50.0);
    let b = Rect::new(50.0, 0.0, 50.0, 50.0);
    assert!(a.intersects(&b));
}

#[test]
fn intersects_disjoint() {
    let a = Rect::new(0.0, 0.0, 50.0, 50.0);
    let b = Rect::new(100.0, 100.0, 50.0, 50.0);
    assert!(!a.intersects(&b));
    let c = Rect::new(0.0, 51.0, 50.0, 50.0);
    assert!(!a.intersects(&c));
}

#[test]
fn contains_is_inclusive() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(pt(0.0, 0.0)));
    assert!(r.contains(pt(10.0, 10.0)));
    assert!(!r.contains(pt(10.1, 5.0)));
}

#[test]
fn translate_and_inflate() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(r.translate(5.0, -5.0), Rect::new(5.0, -5.0, 10.0, 10.0));
    assert_eq!(r.inflate(2.0), Rect::new(-2.0, -2.0, 14.0, 14.0));
}

// =============================================================
// Bounding box
// =============================================================

#[test]
fn bounding_box_empty_is_none() {
    assert!(bounding_box(Vec::new()).is_none());
}

#[test]
fn bounding_box_spans_all() {
    let rects = vec![Rect::new(10.0, 20.0, 30.0, 40.0), Rect::new(-5.0, 50.0, 10.0, 10.0)];
    assert_eq!(bounding_box(rects), Some(Rect::new(-5.0, 20.0, 45.0, 40.0)));
}

// =============================================================
// Snap
// =============================================================

#[test]
fn snap_rounds_to_nearest_multiple() {
    assert_eq!(snap(29.0, 20.0), 20.0);
    assert_eq!(snap(31.0, 20.0), 40.0);
    assert_eq!(snap(-29.0, 20.0), -20.0);
    assert_eq!(snap(30.0, 20.0), 40.0);
}

#[test]
fn snap_is_idempotent() {
    let grids = [1.0, 7.5, 20.0, 33.0];
    let values = [-123.4, -0.5, 0.0, 9.99, 10.0, 47.2, 1e5 + 0.3];
    for g in grids {
        for v in values {
            let once = snap(v, g);
            assert_eq!(snap(once, g), once, "v={v} g={g}");
        }
    }
}

#[test]
fn snap_non_positive_grid_is_identity() {
    assert_eq!(snap(13.3, 0.0), 13.3);
    assert_eq!(snap(13.3, -5.0), 13.3);
}

#[test]
fn snap_point_snaps_both_axes() {
    assert_eq!(snap_point(pt(11.0, 29.0), 20.0), pt(20.0, 20.0));
}

#[test]
fn snap_size_never_collapses() {
    assert_eq!(snap_size(4.0, 20.0), 20.0);
    assert_eq!(snap_size(55.0, 20.0), 60.0);
}
