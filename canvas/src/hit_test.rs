#![allow(clippy::float_cmp)]

use time::OffsetDateTime;

use super::*;
use crate::doc::{ImageItem, Note};
use crate::selection::SelectMode;

fn image(id: &str, x: f64, y: f64, w: f64, h: f64) -> ImageItem {
    ImageItem { id: id.to_owned(), src: String::new(), x, y, width: w, height: h, rotation: 0.0 }
}

fn board() -> Board {
    let mut b = Board::new("b".to_owned(), "Board".to_owned(), OffsetDateTime::UNIX_EPOCH);
    b.add_image(image("under", 0.0, 0.0, 200.0, 200.0));
    b.add_image(image("over", 50.0, 50.0, 100.0, 100.0));
    b
}

fn selected(id: &str) -> Selection {
    let mut sel = Selection::new();
    sel.click(id, SelectMode::Replace);
    sel
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Items
// =============================================================

#[test]
fn empty_space_hits_nothing() {
    let hit = hit_test(pt(500.0, 500.0), &board(), &Camera::default(), &Selection::new());
    assert!(hit.is_none());
}

#[test]
fn later_image_is_on_top() {
    let hit = hit_test(pt(100.0, 100.0), &board(), &Camera::default(), &Selection::new());
    assert_eq!(hit, Some(Hit::Item { id: "over".to_owned(), part: HitPart::Body }));
}

#[test]
fn notes_are_above_images() {
    let mut b = board();
    b.add_note(Note::new(
        "note".to_owned(),
        String::new(),
        Rect::new(90.0, 90.0, 150.0, 100.0),
        OffsetDateTime::UNIX_EPOCH,
    ));
    let hit = hit_test(pt(100.0, 100.0), &b, &Camera::default(), &Selection::new());
    assert_eq!(hit, Some(Hit::Item { id: "note".to_owned(), part: HitPart::Body }));
}

// =============================================================
// Handles
// =============================================================

#[test]
fn handle_hit_on_single_selection() {
    let hit = hit_test(pt(152.0, 149.0), &board(), &Camera::default(), &selected("over"));
    assert_eq!(hit, Some(Hit::Item { id: "over".to_owned(), part: HitPart::ResizeHandle(ResizeAnchor::Se) }));
}

#[test]
fn handles_ignored_without_selection() {
    let hit = hit_test(pt(152.0, 149.0), &board(), &Camera::default(), &Selection::new());
    assert_eq!(hit, Some(Hit::Item { id: "under".to_owned(), part: HitPart::Body }));
}

#[test]
fn handle_radius_is_screen_space() {
    let camera = Camera { zoom: 4.0, ..Camera::default() };
    // 8px at zoom 4 is 2 canvas units
    let near = hit_test(pt(151.5, 150.0), &board(), &camera, &selected("over"));
    assert!(matches!(near, Some(Hit::Item { part: HitPart::ResizeHandle(ResizeAnchor::Se), .. })));
    let far = hit_test(pt(153.0, 150.0), &board(), &camera, &selected("over"));
    assert!(!matches!(far, Some(Hit::Item { part: HitPart::ResizeHandle(_), .. })));
}

#[test]
fn handle_positions() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(handle_position(&r, ResizeAnchor::Nw), pt(0.0, 0.0));
    assert_eq!(handle_position(&r, ResizeAnchor::E), pt(100.0, 25.0));
    assert_eq!(handle_position(&r, ResizeAnchor::S), pt(50.0, 50.0));
}

// =============================================================
// Group headers
// =============================================================

#[test]
fn group_header_band_is_hit() {
    let mut b = Board::new("b".to_owned(), "Board".to_owned(), OffsetDateTime::UNIX_EPOCH);
    b.add_image(image("a", 0.0, 0.0, 50.0, 50.0));
    b.add_image(image("c", 100.0, 0.0, 50.0, 50.0));
    assert!(b.create_group("g".to_owned(), "Pair", &["a".to_owned(), "c".to_owned()]).is_ok());
    // frame starts 20 + 40 above the members
    let hit = hit_test(pt(10.0, -50.0), &b, &Camera::default(), &Selection::new());
    assert_eq!(hit, Some(Hit::GroupHeader { id: "g".to_owned() }));
    let miss = hit_test(pt(10.0, -10.0), &b, &Camera::default(), &Selection::new());
    assert!(miss.is_none());
}

// =============================================================
// Resize geometry
// =============================================================

#[test]
fn note_resize_from_se_grows() {
    let r = resize_rect(Rect::new(0.0, 0.0, 200.0, 200.0), ResizeAnchor::Se, ItemKind::Note, 30.0, 10.0, None);
    assert_eq!(r, Rect::new(0.0, 0.0, 230.0, 210.0));
}

#[test]
fn note_resize_clamps_to_minimum() {
    let r = resize_rect(Rect::new(0.0, 0.0, 200.0, 200.0), ResizeAnchor::Se, ItemKind::Note, -500.0, -500.0, None);
    assert_eq!((r.width, r.height), (NOTE_MIN_WIDTH, NOTE_MIN_HEIGHT));
}

#[test]
fn nw_resize_keeps_opposite_corner() {
    let orig = Rect::new(100.0, 100.0, 200.0, 200.0);
    let r = resize_rect(orig, ResizeAnchor::Nw, ItemKind::Note, 20.0, 30.0, None);
    assert_eq!(r.right(), orig.right());
    assert_eq!(r.bottom(), orig.bottom());
    assert_eq!((r.width, r.height), (180.0, 170.0));
}

#[test]
fn image_resize_preserves_aspect() {
    let r = resize_rect(Rect::new(0.0, 0.0, 200.0, 100.0), ResizeAnchor::E, ItemKind::Image, 100.0, 0.0, None);
    assert_eq!((r.width, r.height), (300.0, 150.0));
    let r = resize_rect(Rect::new(0.0, 0.0, 200.0, 100.0), ResizeAnchor::S, ItemKind::Image, 0.0, 50.0, None);
    assert_eq!((r.width, r.height), (300.0, 150.0));
}

#[test]
fn image_resize_min_width() {
    let r = resize_rect(Rect::new(0.0, 0.0, 200.0, 100.0), ResizeAnchor::E, ItemKind::Image, -190.0, 0.0, None);
    assert_eq!((r.width, r.height), (IMAGE_MIN_WIDTH, 50.0));
}

#[test]
fn resize_snaps_size_to_grid() {
    let r = resize_rect(Rect::new(0.0, 0.0, 200.0, 200.0), ResizeAnchor::Se, ItemKind::Note, 13.0, 27.0, Some(20.0));
    assert_eq!((r.width, r.height), (220.0, 220.0));
}

#[test]
fn anchor_cursors() {
    assert_eq!(ResizeAnchor::Se.cursor(), "nwse-resize");
    assert_eq!(ResizeAnchor::Ne.cursor(), "nesw-resize");
    assert_eq!(ResizeAnchor::N.cursor(), "ns-resize");
}
