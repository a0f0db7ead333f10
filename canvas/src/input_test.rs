#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
    assert!(!m.command());
    assert!(!m.extends_selection());
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
    assert!(!Modifiers { shift: true, ..Default::default() }.command());
}

#[test]
fn alt_does_not_extend_selection() {
    assert!(!Modifiers { alt: true, ..Default::default() }.extends_selection());
    assert!(Modifiers { shift: true, ..Default::default() }.extends_selection());
}

// =============================================================
// Key / Button
// =============================================================

#[test]
fn key_new_and_equality() {
    assert_eq!(Key::new("Escape"), Key("Escape".to_owned()));
    assert_ne!(Key::new("a"), Key::new("A"));
}

#[test]
fn button_variants_distinct() {
    assert_ne!(Button::Primary, Button::Middle);
    assert_ne!(Button::Middle, Button::Secondary);
}

// =============================================================
// UiState
// =============================================================

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert!(ui.selection.is_empty());
    assert!(ui.snap_to_grid);
    assert_eq!(ui.grid_size, DEFAULT_GRID_SIZE);
    assert!(ui.guides.is_empty());
    assert!(ui.marquee.is_none());
    assert!(!ui.space_held);
    assert_eq!(ui.cursor, "default");
}

#[test]
fn snap_grid_respects_toggle() {
    let mut ui = UiState::default();
    assert_eq!(ui.snap_grid(), Some(DEFAULT_GRID_SIZE));
    ui.snap_to_grid = false;
    assert_eq!(ui.snap_grid(), None);
    ui.snap_to_grid = true;
    ui.grid_size = 0.0;
    assert_eq!(ui.snap_grid(), None);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
}

#[test]
fn panning_is_not_idle() {
    let state = InputState::Panning { last_screen: Point::new(1.0, 2.0) };
    assert!(!state.is_idle());
}

#[test]
fn dragging_items_carries_origins() {
    let state = InputState::DraggingItems {
        lead_id: "a".to_owned(),
        last_world: Point::new(0.0, 0.0),
        origins: vec![("a".to_owned(), Point::new(5.0, 6.0))],
        moved: false,
        collapse_on_release: false,
    };
    match state {
        InputState::DraggingItems { origins, moved, .. } => {
            assert_eq!(origins.len(), 1);
            assert!(!moved);
        }
        _ => panic!("expected DraggingItems"),
    }
}
