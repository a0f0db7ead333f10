#![allow(clippy::float_cmp)]

use serde_json::json;
use time::macros::datetime;

use super::*;

fn image(id: &str, x: f64, y: f64, w: f64, h: f64) -> ImageItem {
    ImageItem { id: id.to_owned(), src: format!("data:image/png;base64,{id}"), x, y, width: w, height: h, rotation: 0.0 }
}

fn note(id: &str, x: f64, y: f64) -> Note {
    Note::new(id.to_owned(), "text".to_owned(), Rect::new(x, y, 150.0, 100.0), OffsetDateTime::UNIX_EPOCH)
}

fn board() -> Board {
    Board::new("board-1".to_owned(), "Brand".to_owned(), datetime!(2024-01-15 0:00 UTC))
}

fn ids(list: &[&str]) -> Vec<ItemId> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

// =============================================================
// Serde
// =============================================================

#[test]
fn legacy_board_without_groups_or_notes_loads() {
    let raw = json!({
        "id": "1",
        "name": "Brand Inspiration",
        "images": [{"id": "i1", "src": "x", "x": 1, "y": 2, "width": 3, "height": 4}],
        "createdAt": "2024-01-15T00:00:00Z",
        "viewMode": "grid"
    });
    let board: Board = serde_json::from_value(raw).unwrap();
    assert!(board.groups.is_empty());
    assert!(board.notes.is_empty());
    assert_eq!(board.images[0].rotation, 0.0);
    assert_eq!(board.created_at, datetime!(2024-01-15 0:00 UTC));
}

#[test]
fn board_serializes_camel_case() {
    let mut b = board();
    b.add_image(image("a", 0.0, 0.0, 10.0, 10.0));
    b.add_image(image("b", 0.0, 0.0, 10.0, 10.0));
    b.create_group("g".to_owned(), "Pair", &ids(&["a", "b"])).unwrap();
    let value = serde_json::to_value(&b).unwrap();
    assert_eq!(value["viewMode"], "grid");
    assert_eq!(value["createdAt"], "2024-01-15T00:00:00Z");
    assert_eq!(value["groups"][0]["imageIds"], json!(["a", "b"]));
    assert_eq!(value["groups"][0]["layoutDirection"], "horizontal");
}

#[test]
fn note_missing_color_gets_default_palette_entry() {
    let raw = json!({"id": "n", "text": "hello", "x": 0, "y": 0, "width": 150, "height": 100});
    let n: Note = serde_json::from_value(raw).unwrap();
    assert_eq!(n.color, NOTE_COLORS[0].1);
    assert_eq!(n.created_at, OffsetDateTime::UNIX_EPOCH);
}

#[test]
fn view_mode_lowercase() {
    assert_eq!(serde_json::to_string(&ViewMode::Freeform).unwrap(), "\"freeform\"");
    let v: ViewMode = serde_json::from_str("\"grid\"").unwrap();
    assert_eq!(v, ViewMode::Grid);
}

#[test]
fn new_id_carries_prefix() {
    let id = new_id("img");
    assert!(id.starts_with("img-"));
    assert_ne!(id, new_id("img"));
}

// =============================================================
// Palette
// =============================================================

#[test]
fn palette_text_colors() {
    assert_eq!(note_text_color("#DBEAFE"), "#1E3A8A");
    assert_eq!(note_text_color("#dbeafe"), "#1E3A8A");
    assert_eq!(note_text_color("#123456"), "#000000");
}

#[test]
fn resolve_color_by_name_or_value() {
    assert_eq!(resolve_note_color("green"), Some("#D1FAE5"));
    assert_eq!(resolve_note_color("#FED7AA"), Some("#FED7AA"));
    assert_eq!(resolve_note_color("purple"), None);
}

// =============================================================
// Items
// =============================================================

#[test]
fn item_boxes_images_then_notes() {
    let mut b = board();
    b.add_note(note("n1", 0.0, 0.0));
    b.add_image(image("i1", 0.0, 0.0, 10.0, 10.0));
    let order: Vec<ItemId> = b.item_boxes().into_iter().map(|bx| bx.id).collect();
    assert_eq!(order, ids(&["i1", "n1"]));
    assert_eq!(b.item_kind("n1"), Some(ItemKind::Note));
    assert_eq!(b.item_kind("zzz"), None);
}

#[test]
fn set_item_size_rejects_non_positive() {
    let mut b = board();
    b.add_image(image("i1", 0.0, 0.0, 10.0, 10.0));
    assert!(!b.set_item_size("i1", 0.0, 5.0));
    assert!(!b.set_item_size("i1", 5.0, f64::NAN));
    assert!(b.set_item_size("i1", 120.0, 80.0));
    assert_eq!(b.item_rect("i1"), Some(Rect::new(0.0, 0.0, 120.0, 80.0)));
}

#[test]
fn remove_unknown_item_is_false() {
    let mut b = board();
    assert!(!b.remove_item("missing"));
}

#[test]
fn removing_last_member_drops_group() {
    let mut b = board();
    b.add_image(image("a", 0.0, 0.0, 10.0, 10.0));
    b.add_image(image("c", 0.0, 0.0, 10.0, 10.0));
    b.create_group("g".to_owned(), "Pair", &ids(&["a", "c"])).unwrap();
    assert!(b.remove_item("a"));
    assert!(b.group("g").is_some());
    assert!(b.remove_item("c"));
    assert!(b.group("g").is_none());
}

#[test]
fn clear_empties_everything() {
    let mut b = board();
    b.add_image(image("a", 0.0, 0.0, 10.0, 10.0));
    b.add_note(note("n", 0.0, 0.0));
    b.clear();
    assert_eq!(b.item_count(), 0);
    assert!(b.groups.is_empty());
}

// =============================================================
// Groups
// =============================================================

#[test]
fn create_group_anchors_at_bounding_box_and_flows() {
    let mut b = board();
    b.add_image(image("a", 300.0, 200.0, 50.0, 40.0));
    b.add_image(image("c", 100.0, 260.0, 60.0, 40.0));
    let g = b.create_group("g".to_owned(), "  Pair  ", &ids(&["a", "c"])).unwrap().clone();
    assert_eq!(g.name, "Pair");
    assert_eq!((g.x, g.y), (100.0, 200.0));
    assert_eq!(g.gap, GROUP_DEFAULT_GAP);
    assert_eq!(b.item_rect("a").map(|r| (r.x, r.y)), Some((100.0, 200.0)));
    assert_eq!(b.item_rect("c").map(|r| (r.x, r.y)), Some((166.0, 200.0)));
}

#[test]
fn create_group_rejects_short_name() {
    let mut b = board();
    b.add_image(image("a", 0.0, 0.0, 10.0, 10.0));
    b.add_image(image("c", 0.0, 0.0, 10.0, 10.0));
    let err = b.create_group("g".to_owned(), " x ", &ids(&["a", "c"]));
    assert_eq!(err.err(), Some(GroupRejection::NameTooShort));
}

#[test]
fn create_group_needs_two_existing_items() {
    let mut b = board();
    b.add_image(image("a", 0.0, 0.0, 10.0, 10.0));
    let err = b.create_group("g".to_owned(), "Solo", &ids(&["a", "a", "ghost"]));
    assert_eq!(err.err(), Some(GroupRejection::TooFewItems));
    assert!(b.groups.is_empty());
}

#[test]
fn create_group_steals_members_from_other_groups() {
    let mut b = board();
    for id in ["a", "c", "d"] {
        b.add_image(image(id, 0.0, 0.0, 10.0, 10.0));
    }
    b.create_group("g1".to_owned(), "First", &ids(&["a", "c"])).unwrap();
    b.create_group("g2".to_owned(), "Second", &ids(&["c", "d"])).unwrap();
    assert_eq!(b.group("g1").map(|g| g.image_ids.clone()), Some(ids(&["a"])));
    assert_eq!(b.group_of("c").map(|g| g.id.clone()), Some("g2".to_owned()));

    b.create_group("g3".to_owned(), "Third", &ids(&["a", "d"])).unwrap();
    assert!(b.group("g1").is_none());
    assert_eq!(b.group("g2").map(|g| g.image_ids.clone()), Some(ids(&["c"])));
}

#[test]
fn ungroup_keeps_items_delete_group_removes_them() {
    let mut b = board();
    for id in ["a", "c", "d", "e"] {
        b.add_image(image(id, 0.0, 0.0, 10.0, 10.0));
    }
    b.create_group("g1".to_owned(), "Keep", &ids(&["a", "c"])).unwrap();
    b.create_group("g2".to_owned(), "Drop", &ids(&["d", "e"])).unwrap();

    assert!(b.ungroup("g1"));
    assert_eq!(b.item_count(), 4);
    assert!(b.delete_group("g2"));
    assert_eq!(b.item_ids(), ids(&["a", "c"]));
    assert!(!b.delete_group("g2"));
}

#[test]
fn direction_and_gap_reflow() {
    let mut b = board();
    b.add_image(image("a", 0.0, 0.0, 50.0, 40.0));
    b.add_image(image("c", 0.0, 0.0, 50.0, 30.0));
    b.create_group("g".to_owned(), "Pair", &ids(&["a", "c"])).unwrap();

    assert!(b.set_group_direction("g", LayoutDirection::Vertical));
    assert_eq!(b.item_rect("c").map(|r| (r.x, r.y)), Some((0.0, 56.0)));

    assert!(b.set_group_gap("g", -4.0));
    assert_eq!(b.group("g").map(|g| g.gap), Some(0.0));
    assert_eq!(b.item_rect("c").map(|r| r.y), Some(40.0));
}

#[test]
fn rename_group_ignores_blank() {
    let mut b = board();
    b.add_image(image("a", 0.0, 0.0, 10.0, 10.0));
    b.add_image(image("c", 0.0, 0.0, 10.0, 10.0));
    b.create_group("g".to_owned(), "Pair", &ids(&["a", "c"])).unwrap();
    assert!(!b.rename_group("g", "   "));
    assert!(b.rename_group("g", "Renamed"));
    assert_eq!(b.group("g").map(|g| g.name.as_str()), Some("Renamed"));
}

#[test]
fn layout_direction_toggles() {
    assert_eq!(LayoutDirection::Horizontal.toggled(), LayoutDirection::Vertical);
    assert_eq!(LayoutDirection::Vertical.toggled(), LayoutDirection::Horizontal);
}
