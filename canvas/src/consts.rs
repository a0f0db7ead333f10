//! Shared numeric constants for the canvas crate.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.25;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 4.0;

/// Multiplicative step for keyboard zoom in/out.
pub const ZOOM_STEP: f64 = 1.2;

/// Wheel delta to zoom exponent scale; `factor = exp(-dy * sensitivity)`.
pub const ZOOM_WHEEL_SENSITIVITY: f64 = 0.002;

// ── Snapping ────────────────────────────────────────────────────

/// Default grid size in canvas units.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Alignment guide threshold in canvas units (strict `<`).
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Arrow-key nudge when grid snapping is off.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge with Shift held when grid snapping is off.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

// ── Items ───────────────────────────────────────────────────────

/// Minimum image width; height follows the aspect ratio.
pub const IMAGE_MIN_WIDTH: f64 = 100.0;

/// Minimum note width.
pub const NOTE_MIN_WIDTH: f64 = 150.0;

/// Minimum note height.
pub const NOTE_MIN_HEIGHT: f64 = 100.0;

/// Default note size.
pub const NOTE_DEFAULT_WIDTH: f64 = 200.0;
pub const NOTE_DEFAULT_HEIGHT: f64 = 200.0;

// ── Groups ──────────────────────────────────────────────────────

/// Inset between a group's member bounding box and its rendered frame.
pub const GROUP_FRAME_PADDING: f64 = 20.0;

/// Header band height above a group's frame.
pub const GROUP_HEADER_HEIGHT: f64 = 40.0;

/// Gap between members of a newly created group.
pub const GROUP_DEFAULT_GAP: f64 = 16.0;

/// Minimum trimmed length of a group name.
pub const GROUP_NAME_MIN_LEN: usize = 2;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;
