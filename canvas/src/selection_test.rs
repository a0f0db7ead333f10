use super::*;
use crate::doc::ItemKind;

fn item(id: &str, x: f64, y: f64, w: f64, h: f64) -> ItemBox {
    ItemBox { id: id.to_owned(), kind: ItemKind::Image, rect: Rect::new(x, y, w, h) }
}

fn two_items() -> Vec<ItemBox> {
    vec![item("A", 0.0, 0.0, 50.0, 50.0), item("B", 100.0, 100.0, 50.0, 50.0)]
}

fn marquee(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    use crate::camera::Point;
    Rect::from_corners(Point::new(x0, y0), Point::new(x1, y1))
}

// =============================================================
// Click modes
// =============================================================

#[test]
fn replace_click_selects_only_item() {
    let mut sel = Selection::new();
    sel.click("A", SelectMode::Replace);
    sel.click("B", SelectMode::Replace);
    assert_eq!(sel.to_sorted_vec(), vec!["B".to_owned()]);
    assert_eq!(sel.single().map(String::as_str), Some("B"));
}

#[test]
fn replace_click_on_sole_selected_is_unchanged() {
    let mut sel = Selection::new();
    sel.click("A", SelectMode::Replace);
    assert!(!sel.click("A", SelectMode::Replace));
}

#[test]
fn toggle_click_adds_then_removes() {
    let mut sel = Selection::new();
    sel.click("A", SelectMode::Replace);
    sel.click("B", SelectMode::Toggle);
    assert_eq!(sel.len(), 2);
    sel.click("A", SelectMode::Toggle);
    assert_eq!(sel.to_sorted_vec(), vec!["B".to_owned()]);
}

#[test]
fn add_click_never_removes() {
    let mut sel = Selection::new();
    assert!(sel.click("A", SelectMode::Add));
    assert!(!sel.click("A", SelectMode::Add));
    assert!(sel.contains("A"));
}

#[test]
fn modifiers_map_to_modes() {
    assert_eq!(SelectMode::from_modifiers(Modifiers::default()), SelectMode::Replace);
    assert_eq!(SelectMode::from_modifiers(Modifiers { shift: true, ..Default::default() }), SelectMode::Add);
    assert_eq!(SelectMode::from_modifiers(Modifiers { meta: true, ..Default::default() }), SelectMode::Toggle);
    assert_eq!(
        SelectMode::from_modifiers(Modifiers { ctrl: true, shift: true, ..Default::default() }),
        SelectMode::Toggle
    );
}

#[test]
fn clear_reports_change() {
    let mut sel = Selection::new();
    assert!(!sel.clear());
    sel.click("A", SelectMode::Replace);
    assert!(sel.clear());
    assert!(sel.is_empty());
}

#[test]
fn select_all_replaces() {
    let mut sel = Selection::new();
    sel.click("Z", SelectMode::Replace);
    sel.select_all(vec!["A".to_owned(), "B".to_owned()]);
    assert_eq!(sel.to_sorted_vec(), vec!["A".to_owned(), "B".to_owned()]);
}

// =============================================================
// Marquee
// =============================================================

#[test]
fn marquee_selects_only_intersected() {
    let items = two_items();
    let mut sel = Selection::new();
    sel.apply_marquee(marquee(0.0, 0.0, 60.0, 60.0), &items, false);
    assert_eq!(sel.to_sorted_vec(), vec!["A".to_owned()]);

    sel.apply_marquee(marquee(0.0, 0.0, 200.0, 200.0), &items, false);
    assert_eq!(sel.to_sorted_vec(), vec!["A".to_owned(), "B".to_owned()]);
}

#[test]
fn marquee_drawn_backwards_selects_same_items() {
    let items = two_items();
    let mut sel = Selection::new();
    sel.apply_marquee(marquee(60.0, 60.0, 0.0, 0.0), &items, false);
    assert_eq!(sel.to_sorted_vec(), vec!["A".to_owned()]);
}

#[test]
fn marquee_without_modifier_clears_previous() {
    let items = two_items();
    let mut sel = Selection::new();
    sel.click("B", SelectMode::Replace);
    sel.apply_marquee(marquee(0.0, 0.0, 60.0, 60.0), &items, false);
    assert_eq!(sel.to_sorted_vec(), vec!["A".to_owned()]);
}

#[test]
fn marquee_with_modifier_unions() {
    let items = two_items();
    let mut sel = Selection::new();
    sel.click("B", SelectMode::Replace);
    sel.apply_marquee(marquee(0.0, 0.0, 60.0, 60.0), &items, true);
    assert_eq!(sel.to_sorted_vec(), vec!["A".to_owned(), "B".to_owned()]);
}

#[test]
fn zero_extent_marquee_selects_nothing() {
    let items = two_items();
    assert!(marquee_hits(marquee(10.0, 10.0, 10.0, 10.0), &items).is_empty());

    let mut sel = Selection::new();
    sel.click("B", SelectMode::Replace);
    sel.apply_marquee(marquee(10.0, 10.0, 10.0, 10.0), &items, true);
    assert_eq!(sel.to_sorted_vec(), vec!["B".to_owned()]);
}

#[test]
fn thin_marquee_still_selects() {
    let items = two_items();
    assert_eq!(marquee_hits(marquee(10.0, -5.0, 10.0, 5.0), &items), vec!["A".to_owned()]);
}

// =============================================================
// Pruning
// =============================================================

#[test]
fn retain_existing_drops_deleted() {
    let mut sel = Selection::new();
    sel.select_all(vec!["A".to_owned(), "B".to_owned()]);
    sel.retain_existing(&["B".to_owned()]);
    assert_eq!(sel.to_sorted_vec(), vec!["B".to_owned()]);
    assert!(sel.remove("B"));
    assert!(!sel.remove("B"));
}
