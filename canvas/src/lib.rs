//! Canvas interaction core for the moodboard.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and natively
//! for tests and the command-line front end. It owns the interaction model of
//! the freeform canvas: translating raw DOM input events into board
//! mutations, maintaining camera state for pan/zoom, hit-testing items,
//! computing alignment guides, laying out groups and rendering the scene.
//! The host layer wires DOM events to the engine and forwards the resulting
//! [`engine::Action`]s to the board store.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Board, image, note and group types and their mutations |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`geom`] | Rectangles, bounding boxes and grid snapping |
//! | [`selection`] | Selection set, click modes and marquee selection |
//! | [`guides`] | Alignment guides for the item being dragged |
//! | [`layout`] | Group flow layout and frame geometry |
//! | [`align`] | Align and distribute operations |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing and resize-handle geometry |
//! | [`render`] | Scene rendering to a 2D context |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod align;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod guides;
pub mod hit;
pub mod input;
pub mod layout;
pub mod render;
pub mod selection;
