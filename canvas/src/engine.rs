//! Engine: turns pointer, wheel and keyboard input into board mutations.
//!
//! `EngineCore` holds everything that does not need a browser: the board,
//! camera, UI state and the gesture state machine. `Engine` wraps it together
//! with the `<canvas>` element and adds rendering.
//!
//! Every handler returns a list of [`Action`]s. Geometry commits are reported
//! per item (`ItemUpdated`) and per group, so the host can forward them to the
//! board store one by one. Live drag feedback mutates the engine's own board
//! without snapping and without emitting commits; only pointer-up, keyboard
//! commands and explicit operations emit them.

use time::OffsetDateTime;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::align::{self, AlignEdge, DistributeAxis, ItemMove};
use crate::camera::{Camera, Point};
use crate::consts::{NUDGE_STEP, NUDGE_STEP_LARGE, SNAP_THRESHOLD, ZOOM_STEP, ZOOM_WHEEL_SENSITIVITY};
use crate::doc::{Board, Group, GroupRejection, ImageItem, ItemBox, ItemId, LayoutDirection, Note, new_id};
use crate::geom::{Rect, snap, snap_point};
use crate::guides::{Guide, compute_guides};
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::layout;
use crate::render;
use crate::selection::SelectMode;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// An item's committed geometry.
    ItemUpdated { id: ItemId, rect: Rect },
    ItemDeleted { id: ItemId },
    GroupCreated(Group),
    GroupUpdated(Group),
    GroupDeleted { id: ItemId },
    /// The full selection after a change, sorted.
    SelectionChanged(Vec<ItemId>),
    SetCursor(String),
    RenderNeeded,
}

/// Item and group geometry captured before a mutation, diffed afterwards.
struct Geometry {
    boxes: Vec<ItemBox>,
    groups: Vec<Group>,
}

impl Geometry {
    fn capture(board: &Board) -> Self {
        Self { boxes: board.item_boxes(), groups: board.groups.clone() }
    }

    /// Actions describing what changed: deletions first, then groups, then
    /// item geometry.
    fn changes(&self, board: &Board) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .boxes
            .iter()
            .filter(|b| board.item_kind(&b.id).is_none())
            .map(|b| Action::ItemDeleted { id: b.id.clone() })
            .collect();

        for group in &self.groups {
            if board.group(&group.id).is_none() {
                actions.push(Action::GroupDeleted { id: group.id.clone() });
            }
        }
        for group in &board.groups {
            match self.groups.iter().find(|g| g.id == group.id) {
                None => actions.push(Action::GroupCreated(group.clone())),
                Some(prev) if prev != group => actions.push(Action::GroupUpdated(group.clone())),
                Some(_) => {}
            }
        }
        for after in board.item_boxes() {
            let moved = self
                .boxes
                .iter()
                .find(|b| b.id == after.id)
                .is_some_and(|b| b.rect != after.rect);
            if moved {
                actions.push(Action::ItemUpdated { id: after.id, rect: after.rect });
            }
        }
        actions
    }
}

/// Core engine state: the logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub board: Board,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            board: Board::new(String::new(), String::new(), OffsetDateTime::UNIX_EPOCH),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Show a board. Resets the viewport, the selection and any gesture.
    pub fn load_board(&mut self, board: Board) {
        self.board = board;
        self.camera.reset();
        self.ui.selection.clear();
        self.ui.guides.clear();
        self.ui.marquee = None;
        self.input = InputState::Idle;
    }

    /// Apply an image created or changed elsewhere.
    pub fn apply_image(&mut self, image: ImageItem) {
        self.board.put_image(image);
    }

    /// Apply a note created or changed elsewhere.
    pub fn apply_note(&mut self, note: Note) {
        self.board.put_note(note);
    }

    /// Apply a group created or changed elsewhere.
    pub fn apply_group(&mut self, group: Group) {
        self.board.put_group(group);
    }

    /// Apply an item deletion made elsewhere.
    pub fn apply_remove_item(&mut self, id: &str) {
        self.board.remove_item(id);
        self.ui.selection.remove(id);
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        if grid_size > 0.0 && grid_size.is_finite() {
            self.ui.grid_size = grid_size;
        }
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.ui.snap_to_grid = enabled;
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.input.is_idle() {
            return actions;
        }
        if button == Button::Middle || (button == Button::Primary && self.ui.space_held) {
            self.input = InputState::Panning { last_screen: screen_pt };
            self.set_cursor("grabbing", &mut actions);
            return actions;
        }
        if button != Button::Primary {
            return actions;
        }

        let world = self.camera.screen_to_world(screen_pt);
        match hit::hit_test(world, &self.board, &self.camera, &self.ui.selection) {
            Some(Hit::Item { id, part: HitPart::ResizeHandle(anchor) }) => {
                if let (Some(kind), Some(orig)) = (self.board.item_kind(&id), self.board.item_rect(&id)) {
                    self.input = InputState::ResizingItem { id, kind, anchor, start_world: world, orig };
                    self.set_cursor(anchor.cursor(), &mut actions);
                }
            }
            Some(Hit::Item { id, part: HitPart::Body }) => self.begin_item_drag(id, world, modifiers, &mut actions),
            Some(Hit::GroupHeader { id }) => {
                let members = self.board.group(&id).map(|g| g.image_ids.clone()).unwrap_or_default();
                let before = self.ui.selection.clone();
                self.ui.selection.select_all(members);
                if self.ui.selection != before {
                    actions.push(self.selection_changed());
                }
                self.input = InputState::DraggingGroup { id, last_world: world, total_dx: 0.0, total_dy: 0.0 };
                self.set_cursor("grabbing", &mut actions);
            }
            None => {
                self.input = InputState::Marquee {
                    start_world: world,
                    current_world: world,
                    keep_existing: modifiers.extends_selection(),
                };
                self.set_cursor("crosshair", &mut actions);
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => {
                self.update_hover(world, &mut actions);
                return actions;
            }
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
            }
            InputState::DraggingItems { lead_id, last_world, origins, moved, collapse_on_release } => {
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                for (id, _) in &origins {
                    if let Some(r) = self.board.item_rect(id) {
                        self.board.set_item_position(id, r.x + dx, r.y + dy);
                    }
                }
                self.refresh_guides(&lead_id, &origins);
                let moved = moved || dx != 0.0 || dy != 0.0;
                self.input = InputState::DraggingItems { lead_id, last_world: world, origins, moved, collapse_on_release };
            }
            InputState::DraggingGroup { id, last_world, total_dx, total_dy } => {
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                layout::translate_group(&mut self.board, &id, dx, dy);
                self.input = InputState::DraggingGroup {
                    id,
                    last_world: world,
                    total_dx: total_dx + dx,
                    total_dy: total_dy + dy,
                };
            }
            InputState::ResizingItem { id, kind, anchor, start_world, orig } => {
                let rect = hit::resize_rect(orig, anchor, kind, world.x - start_world.x, world.y - start_world.y, None);
                self.set_item_rect(&id, rect);
                self.input = InputState::ResizingItem { id, kind, anchor, start_world, orig };
            }
            InputState::Marquee { start_world, keep_existing, .. } => {
                self.ui.marquee = Some(Rect::from_corners(start_world, world));
                self.input = InputState::Marquee { start_world, current_world: world, keep_existing };
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => return actions,
            InputState::Panning { .. } => {
                let cursor = if self.ui.space_held { "grab" } else { "default" };
                self.set_cursor(cursor, &mut actions);
            }
            InputState::DraggingItems { lead_id, origins, moved, collapse_on_release, .. } => {
                self.ui.guides.clear();
                if !moved && collapse_on_release && self.ui.selection.click(&lead_id, SelectMode::Replace) {
                    actions.push(self.selection_changed());
                }
                if moved {
                    let grid = self.ui.snap_grid();
                    for (id, _) in &origins {
                        if let Some(r) = self.board.item_rect(id) {
                            let p = grid.map_or(Point::new(r.x, r.y), |g| snap_point(Point::new(r.x, r.y), g));
                            self.board.set_item_position(id, p.x, p.y);
                            actions.push(Action::ItemUpdated { id: id.clone(), rect: Rect::new(p.x, p.y, r.width, r.height) });
                        }
                    }
                }
                self.set_cursor("move", &mut actions);
            }
            InputState::DraggingGroup { id, total_dx, total_dy, .. } => {
                if total_dx != 0.0 || total_dy != 0.0 {
                    self.commit_group_drag(&id, &mut actions);
                }
                self.set_cursor("grab", &mut actions);
            }
            InputState::ResizingItem { id, kind, anchor, start_world, orig } => {
                let grid = self.ui.snap_grid();
                let rect = hit::resize_rect(orig, anchor, kind, world.x - start_world.x, world.y - start_world.y, grid);
                self.set_item_rect(&id, rect);
                if rect != orig {
                    actions.push(Action::ItemUpdated { id, rect });
                }
                self.set_cursor("default", &mut actions);
            }
            InputState::Marquee { start_world, keep_existing, .. } => {
                self.ui.marquee = None;
                let before = self.ui.selection.clone();
                let boxes = self.board.item_boxes();
                self.ui.selection.apply_marquee(Rect::from_corners(start_world, world), &boxes, keep_existing);
                if self.ui.selection != before {
                    actions.push(self.selection_changed());
                }
                self.set_cursor("default", &mut actions);
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abort the current gesture, putting dragged or resized items back.
    pub fn cancel(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Panning { .. } | InputState::Marquee { .. } => {}
            InputState::DraggingItems { origins, .. } => {
                for (id, p) in &origins {
                    self.board.set_item_position(id, p.x, p.y);
                }
            }
            InputState::DraggingGroup { id, total_dx, total_dy, .. } => {
                layout::translate_group(&mut self.board, &id, -total_dx, -total_dy);
            }
            InputState::ResizingItem { id, orig, .. } => self.set_item_rect(&id, orig),
        }
        self.ui.guides.clear();
        self.ui.marquee = None;
        let mut actions = Vec::new();
        self.set_cursor("default", &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Ctrl/Cmd + wheel zooms at the cursor; a plain wheel pans.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let factor = (-delta.dy * ZOOM_WHEEL_SENSITIVITY).exp();
            self.camera.zoom_by(factor, screen_pt);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let name = key.0.as_str();
        if modifiers.command() {
            return match name {
                "a" | "A" => self.select_all(),
                "+" | "=" => self.zoom_in(),
                "-" | "_" => self.zoom_out(),
                "0" => self.reset_zoom(),
                _ => Vec::new(),
            };
        }
        match name {
            " " => {
                self.ui.space_held = true;
                let mut actions = Vec::new();
                if self.input.is_idle() {
                    self.set_cursor("grab", &mut actions);
                }
                actions
            }
            "Escape" => {
                if self.input.is_idle() {
                    self.deselect()
                } else {
                    self.cancel()
                }
            }
            "Delete" | "Backspace" => self.delete_selected(),
            "ArrowLeft" => self.nudge_selected(-1.0, 0.0, modifiers.shift),
            "ArrowRight" => self.nudge_selected(1.0, 0.0, modifiers.shift),
            "ArrowUp" => self.nudge_selected(0.0, -1.0, modifiers.shift),
            "ArrowDown" => self.nudge_selected(0.0, 1.0, modifiers.shift),
            "g" | "G" => self.toggle_snap(),
            _ => Vec::new(),
        }
    }

    pub fn on_key_up(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if key.0 == " " {
            self.ui.space_held = false;
            if self.input.is_idle() {
                self.set_cursor("default", &mut actions);
            }
        }
        actions
    }

    // --- Commands ---

    pub fn select_all(&mut self) -> Vec<Action> {
        self.ui.selection.select_all(self.board.item_ids());
        vec![self.selection_changed(), Action::RenderNeeded]
    }

    pub fn deselect(&mut self) -> Vec<Action> {
        if self.ui.selection.clear() {
            vec![self.selection_changed(), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Delete every selected item. Groups re-flow and empty groups disappear.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let ids = self.ui.selection.to_sorted_vec();
        if ids.is_empty() {
            return Vec::new();
        }
        self.edit(|board| ids.iter().fold(false, |removed, id| board.remove_item(id) || removed))
    }

    /// Zoom in one step around the viewport center.
    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.camera.zoom_by(ZOOM_STEP, self.viewport_center());
        vec![Action::RenderNeeded]
    }

    /// Zoom out one step around the viewport center.
    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.camera.zoom_by(1.0 / ZOOM_STEP, self.viewport_center());
        vec![Action::RenderNeeded]
    }

    pub fn reset_zoom(&mut self) -> Vec<Action> {
        self.camera.reset();
        vec![Action::RenderNeeded]
    }

    /// Move the selection one step in the given direction.
    ///
    /// The step is one grid cell while snapping (and the result is snapped),
    /// otherwise 1 unit, or 10 with `large`.
    pub fn nudge_selected(&mut self, dir_x: f64, dir_y: f64, large: bool) -> Vec<Action> {
        let grid = self.ui.snap_grid();
        let step = grid.unwrap_or(if large { NUDGE_STEP_LARGE } else { NUDGE_STEP });
        let mut actions = Vec::new();
        for id in self.ui.selection.to_sorted_vec() {
            let Some(r) = self.board.item_rect(&id) else {
                continue;
            };
            let mut p = Point::new(r.x + dir_x * step, r.y + dir_y * step);
            if let Some(g) = grid {
                p = snap_point(p, g);
            }
            self.board.set_item_position(&id, p.x, p.y);
            actions.push(Action::ItemUpdated { id, rect: Rect::new(p.x, p.y, r.width, r.height) });
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn toggle_snap(&mut self) -> Vec<Action> {
        self.ui.snap_to_grid = !self.ui.snap_to_grid;
        vec![Action::RenderNeeded]
    }

    /// Align the selected items. Needs at least two.
    pub fn align_selected(&mut self, edge: AlignEdge) -> Vec<Action> {
        let boxes = self.board.boxes_for(&self.ui.selection.to_sorted_vec());
        let moves = align::align(&boxes, edge, self.ui.snap_grid());
        self.apply_moves(&moves)
    }

    /// Distribute the selected items evenly. Needs at least three.
    pub fn distribute_selected(&mut self, axis: DistributeAxis) -> Vec<Action> {
        let boxes = self.board.boxes_for(&self.ui.selection.to_sorted_vec());
        let moves = align::distribute(&boxes, axis);
        self.apply_moves(&moves)
    }

    /// Group the selection, members ordered left to right.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason when the name is too short or fewer than
    /// two items are selected.
    pub fn group_selected(&mut self, name: &str) -> Result<Vec<Action>, GroupRejection> {
        let mut boxes = self.board.boxes_for(&self.ui.selection.to_sorted_vec());
        boxes.sort_by(|a, b| a.rect.x.total_cmp(&b.rect.x).then(a.rect.y.total_cmp(&b.rect.y)));
        let ids: Vec<ItemId> = boxes.into_iter().map(|b| b.id).collect();

        let before = Geometry::capture(&self.board);
        self.board.create_group(new_id("group"), name, &ids)?;
        let mut actions = before.changes(&self.board);
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    pub fn set_group_direction(&mut self, id: &str, direction: LayoutDirection) -> Vec<Action> {
        self.edit(|board| board.set_group_direction(id, direction))
    }

    pub fn toggle_group_direction(&mut self, id: &str) -> Vec<Action> {
        let Some(direction) = self.board.group(id).map(|g| g.layout_direction.toggled()) else {
            return Vec::new();
        };
        self.set_group_direction(id, direction)
    }

    pub fn set_group_gap(&mut self, id: &str, gap: f64) -> Vec<Action> {
        self.edit(|board| board.set_group_gap(id, gap))
    }

    pub fn rename_group(&mut self, id: &str, name: &str) -> Vec<Action> {
        self.edit(|board| board.rename_group(id, name))
    }

    pub fn ungroup(&mut self, id: &str) -> Vec<Action> {
        self.edit(|board| board.ungroup(id))
    }

    /// Delete a group and its member items.
    pub fn delete_group(&mut self, id: &str) -> Vec<Action> {
        self.edit(|board| board.delete_group(id))
    }

    // --- Queries ---

    /// Selected item ids, sorted.
    #[must_use]
    pub fn selection(&self) -> Vec<ItemId> {
        self.ui.selection.to_sorted_vec()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Guides for the drag in progress.
    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.ui.guides
    }

    // --- Internals ---

    fn begin_item_drag(&mut self, id: ItemId, world: Point, modifiers: Modifiers, actions: &mut Vec<Action>) {
        let mode = SelectMode::from_modifiers(modifiers);
        // Plain press on an already-selected item drags the whole selection.
        let keep = mode == SelectMode::Replace && self.ui.selection.contains(&id);
        let collapse_on_release = keep && self.ui.selection.len() > 1;
        if !keep && self.ui.selection.click(&id, mode) {
            actions.push(self.selection_changed());
        }
        if !self.ui.selection.contains(&id) {
            return;
        }
        let mut origins: Vec<(ItemId, Point)> = self
            .ui
            .selection
            .iter()
            .filter_map(|sid| self.board.item_rect(sid).map(|r| (sid.clone(), Point::new(r.x, r.y))))
            .collect();
        origins.sort_by(|a, b| a.0.cmp(&b.0));
        self.input = InputState::DraggingItems { lead_id: id, last_world: world, origins, moved: false, collapse_on_release };
        self.set_cursor("move", actions);
    }

    fn refresh_guides(&mut self, lead_id: &ItemId, origins: &[(ItemId, Point)]) {
        let Some(lead) = self.board.boxes_for(std::iter::once(lead_id)).into_iter().next() else {
            self.ui.guides.clear();
            return;
        };
        let others: Vec<ItemBox> = self
            .board
            .item_boxes()
            .into_iter()
            .filter(|b| !origins.iter().any(|(id, _)| *id == b.id))
            .collect();
        self.ui.guides = compute_guides(&lead, &others, SNAP_THRESHOLD);
    }

    /// Snap a dragged group's anchor to the grid and report the group and its members.
    fn commit_group_drag(&mut self, id: &str, actions: &mut Vec<Action>) {
        if let Some(g) = self.ui.snap_grid()
            && let Some((x, y)) = self.board.group(id).map(|group| (group.x, group.y))
        {
            layout::translate_group(&mut self.board, id, snap(x, g) - x, snap(y, g) - y);
        }
        let Some(group) = self.board.group(id).cloned() else {
            return;
        };
        for member in &group.image_ids {
            if let Some(rect) = self.board.item_rect(member) {
                actions.push(Action::ItemUpdated { id: member.clone(), rect });
            }
        }
        actions.insert(0, Action::GroupUpdated(group));
    }

    fn apply_moves(&mut self, moves: &[ItemMove]) -> Vec<Action> {
        let mut actions = Vec::new();
        for m in moves {
            let Some(r) = self.board.item_rect(&m.id) else {
                continue;
            };
            if r.x == m.x && r.y == m.y {
                continue;
            }
            self.board.set_item_position(&m.id, m.x, m.y);
            actions.push(Action::ItemUpdated { id: m.id.clone(), rect: Rect::new(m.x, m.y, r.width, r.height) });
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Run a board mutation and report what it changed, pruning the selection.
    fn edit<F>(&mut self, mutate: F) -> Vec<Action>
    where
        F: FnOnce(&mut Board) -> bool,
    {
        let before = Geometry::capture(&self.board);
        if !mutate(&mut self.board) {
            return Vec::new();
        }
        let mut actions = before.changes(&self.board);
        let selected = self.ui.selection.len();
        self.ui.selection.retain_existing(&self.board.item_ids());
        if self.ui.selection.len() != selected {
            actions.push(self.selection_changed());
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn set_item_rect(&mut self, id: &str, rect: Rect) {
        self.board.set_item_position(id, rect.x, rect.y);
        self.board.set_item_size(id, rect.width, rect.height);
    }

    fn update_hover(&mut self, world: Point, actions: &mut Vec<Action>) {
        let cursor = if self.ui.space_held {
            "grab"
        } else {
            match hit::hit_test(world, &self.board, &self.camera, &self.ui.selection) {
                Some(Hit::Item { part: HitPart::ResizeHandle(anchor), .. }) => anchor.cursor(),
                Some(Hit::Item { part: HitPart::Body, .. }) => "move",
                Some(Hit::GroupHeader { .. }) => "grab",
                None => "default",
            }
        };
        self.set_cursor(cursor, actions);
    }

    fn set_cursor(&mut self, cursor: &'static str, actions: &mut Vec<Action>) {
        if self.ui.cursor != cursor {
            self.ui.cursor = cursor;
            actions.push(Action::SetCursor(cursor.to_owned()));
        }
    }

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged(self.ui.selection.to_sorted_vec())
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    // --- Delegated data inputs ---

    pub fn load_board(&mut self, board: Board) {
        self.core.load_board(board);
    }

    /// Load a board from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the JSON is not a valid board document.
    pub fn load_board_json(&mut self, json: &str) -> Result<(), JsValue> {
        let board: Board = serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.core.load_board(board);
        Ok(())
    }

    pub fn apply_image(&mut self, image: ImageItem) {
        self.core.apply_image(image);
    }

    pub fn apply_note(&mut self, note: Note) {
        self.core.apply_note(note);
    }

    pub fn apply_group(&mut self, group: Group) {
        self.core.apply_group(group);
    }

    pub fn apply_remove_item(&mut self, id: &str) {
        self.core.apply_remove_item(id);
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the backing store to match.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            self.canvas.set_width((self.core.viewport_width * self.core.dpr).round() as u32);
            self.canvas.set_height((self.core.viewport_height * self.core.dpr).round() as u32);
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn on_key_up(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    /// Tear down any gesture in progress, e.g. when the view unmounts.
    pub fn cancel(&mut self) -> Vec<Action> {
        self.core.cancel()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        render::draw(
            &ctx,
            &self.core.board,
            &self.core.camera,
            &self.core.ui,
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Vec<ItemId> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.core.board()
    }
}
