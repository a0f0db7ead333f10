//! Input model: modifier keys, mouse buttons, UI state and the gesture state machine.
//!
//! An [`InputState`] variant lives from pointer-down to pointer-up and holds
//! what the engine needs to apply live deltas, commit on release and revert on
//! cancel. Every gesture
//! ends in `Idle`; transient overlays (guides, marquee) live in `UiState` and
//! are cleared when the gesture ends.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::DEFAULT_GRID_SIZE;
use crate::doc::{ItemId, ItemKind};
use crate::geom::Rect;
use crate::guides::Guide;
use crate::hit::ResizeAnchor;
use crate::selection::Selection;

/// Modifier keys held while an event fired.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Option on macOS.
    pub alt: bool,
    /// Command on macOS.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    /// Any modifier that keeps the existing selection during a marquee.
    #[must_use]
    pub fn extends_selection(self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    /// Wheel click; always pans.
    Middle,
    /// Ignored by the canvas.
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Wheel or trackpad delta in screen pixels; positive `dy` scrolls down.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// State that outlives a gesture and is drawn by the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    pub selection: Selection,
    /// Grid snap toggle; applied on commit, never during drag feedback.
    pub snap_to_grid: bool,
    pub grid_size: f64,
    /// Alignment guides for the item being dragged.
    pub guides: Vec<Guide>,
    /// Marquee rectangle in canvas space while one is being drawn.
    pub marquee: Option<Rect>,
    /// Space bar is held; primary drags pan instead of selecting.
    pub space_held: bool,
    /// Last cursor sent to the host.
    pub cursor: &'static str,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selection: Selection::new(),
            snap_to_grid: true,
            grid_size: DEFAULT_GRID_SIZE,
            guides: Vec::new(),
            marquee: None,
            space_held: false,
            cursor: "default",
        }
    }
}

impl UiState {
    /// Grid size to snap to, or `None` when snapping is off.
    #[must_use]
    pub fn snap_grid(&self) -> Option<f64> {
        (self.snap_to_grid && self.grid_size > 0.0).then_some(self.grid_size)
    }
}

/// Gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen position at the previous move.
        last_screen: Point,
    },
    /// The user is moving one or more items.
    DraggingItems {
        /// Item under the pointer; guides are computed for it.
        lead_id: ItemId,
        last_world: Point,
        /// Every dragged item with its position at drag start, used to revert.
        origins: Vec<(ItemId, Point)>,
        /// Set once the pointer has actually moved.
        moved: bool,
        /// Plain press on a member of a larger selection; without movement
        /// the release selects only the lead item.
        collapse_on_release: bool,
    },
    /// The user is moving a whole group by its header.
    DraggingGroup {
        id: ItemId,
        last_world: Point,
        /// Total world-space delta applied so far.
        total_dx: f64,
        total_dy: f64,
    },
    /// The user is resizing an item by dragging one of its eight handles.
    ResizingItem {
        id: ItemId,
        kind: ItemKind,
        anchor: ResizeAnchor,
        /// Pointer at pointer-down, in canvas space.
        start_world: Point,
        /// Item geometry at the start of the resize.
        orig: Rect,
    },
    /// The user is drawing a selection marquee on the background.
    Marquee {
        start_world: Point,
        current_world: Point,
        /// Union into the previous selection instead of replacing it.
        keep_existing: bool,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
