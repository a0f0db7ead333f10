//! Board store: typed commands over immutable snapshots.
//!
//! DESIGN
//! ======
//! The board collection is a [`Snapshot`] held behind an `Arc`. Every
//! mutation is a [`Command`] applied by [`BoardStore::apply`], which clones
//! the current snapshot, mutates the clone and swaps it in. Readers holding
//! an older `Arc<Snapshot>` keep seeing exactly what they read; nothing is
//! ever mutated in place.
//!
//! The active board is never cached: [`active_board`] derives it from the
//! snapshot and an id on every read, falling back to the first board.
//!
//! Canvas commits arrive as engine [`Action`]s and are converted with
//! [`Command::from_action`], so the canvas and the store share one mutation
//! vocabulary.
//!
//! ERROR HANDLING
//! ==============
//! A failed command leaves the store untouched: the clone is dropped and
//! the previous snapshot stays current.

use std::sync::Arc;

use canvas::align::{self, AlignEdge, DistributeAxis, ItemMove};
use canvas::camera::Point;
use canvas::consts::{GROUP_NAME_MIN_LEN, NOTE_DEFAULT_HEIGHT, NOTE_DEFAULT_WIDTH};
use canvas::doc::{
    Board, Group, GroupRejection, ImageItem, ItemBox, ItemId, LayoutDirection, Note, ViewMode, new_id,
    resolve_note_color,
};
use canvas::engine::Action;
use canvas::geom::{Rect, snap_point};
use canvas::layout;
use time::OffsetDateTime;
use tracing::debug;

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

/// Minimum trimmed length of a board name.
pub const BOARD_NAME_MIN_LEN: usize = 3;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BoardError {
    #[error("board not found: {0}")]
    BoardNotFound(ItemId),
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("note not found: {0}")]
    NoteNotFound(ItemId),
    #[error("group not found: {0}")]
    GroupNotFound(ItemId),
    #[error("id already in use: {0}")]
    DuplicateId(ItemId),
    #[error("board name must be at least 3 characters")]
    InvalidBoardName,
    #[error("group name must be at least 2 characters")]
    InvalidGroupName,
    #[error("a group needs at least two items")]
    TooFewGroupItems,
    #[error("cannot delete the last board")]
    LastBoard,
    #[error("unknown note color: {0}")]
    InvalidColor(String),
    #[error("invalid size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

impl ErrorCode for BoardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BoardNotFound(_) => "E_BOARD_NOT_FOUND",
            Self::ItemNotFound(_) => "E_ITEM_NOT_FOUND",
            Self::NoteNotFound(_) => "E_NOTE_NOT_FOUND",
            Self::GroupNotFound(_) => "E_GROUP_NOT_FOUND",
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::InvalidBoardName => "E_BOARD_NAME",
            Self::InvalidGroupName => "E_GROUP_NAME",
            Self::TooFewGroupItems => "E_GROUP_TOO_FEW_ITEMS",
            Self::LastBoard => "E_LAST_BOARD",
            Self::InvalidColor(_) => "E_NOTE_COLOR",
            Self::InvalidSize { .. } => "E_INVALID_SIZE",
        }
    }
}

impl From<GroupRejection> for BoardError {
    fn from(rejection: GroupRejection) -> Self {
        match rejection {
            GroupRejection::NameTooShort => Self::InvalidGroupName,
            GroupRejection::TooFewItems => Self::TooFewGroupItems,
        }
    }
}

/// The whole board collection at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub boards: Vec<Board>,
    pub active_board_id: Option<ItemId>,
}

impl Snapshot {
    #[must_use]
    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    /// The active board, see [`active_board`].
    #[must_use]
    pub fn active(&self) -> Option<&Board> {
        active_board(self, self.active_board_id.as_deref())
    }
}

/// Resolve the board with `id`, or the first board when `id` is unset or unknown.
#[must_use]
pub fn active_board<'a>(snapshot: &'a Snapshot, id: Option<&str>) -> Option<&'a Board> {
    id.and_then(|id| snapshot.board(id)).or_else(|| snapshot.boards.first())
}

/// A default-sized note with its top-left corner at `at`, snapped when `grid` is set.
#[must_use]
pub fn place_note(text: String, at: Point, grid: Option<f64>, created_at: OffsetDateTime) -> Note {
    let at = grid.map_or(at, |g| snap_point(at, g));
    Note::new(new_id("note"), text, Rect::new(at.x, at.y, NOTE_DEFAULT_WIDTH, NOTE_DEFAULT_HEIGHT), created_at)
}

/// Every mutation the store understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBoard { id: ItemId, name: String, created_at: OffsetDateTime },
    RenameBoard { board_id: ItemId, name: String },
    DeleteBoard { board_id: ItemId },
    SetActiveBoard { board_id: ItemId },
    SetViewMode { board_id: ItemId, view_mode: ViewMode },
    /// Remove every image, note and group.
    ClearBoard { board_id: ItemId },
    AddImage { board_id: ItemId, image: ImageItem },
    AddNote { board_id: ItemId, note: Note },
    UpdateNoteText { board_id: ItemId, id: ItemId, text: String },
    UpdateNoteColor { board_id: ItemId, id: ItemId, color: String },
    MoveItem { board_id: ItemId, id: ItemId, x: f64, y: f64 },
    ResizeItem { board_id: ItemId, id: ItemId, width: f64, height: f64 },
    /// Position and size together, as committed by the canvas.
    UpdateItem { board_id: ItemId, id: ItemId, rect: Rect },
    DeleteItem { board_id: ItemId, id: ItemId },
    CreateGroup { board_id: ItemId, group_id: ItemId, name: String, item_ids: Vec<ItemId> },
    /// Insert or replace a group as laid out by the canvas.
    PutGroup { board_id: ItemId, group: Group },
    RenameGroup { board_id: ItemId, id: ItemId, name: String },
    /// Dissolve a group, keeping its items.
    Ungroup { board_id: ItemId, id: ItemId },
    /// Remove a group and its member items.
    DeleteGroup { board_id: ItemId, id: ItemId },
    SetGroupDirection { board_id: ItemId, id: ItemId, direction: LayoutDirection },
    SetGroupGap { board_id: ItemId, id: ItemId, gap: f64 },
    TranslateGroup { board_id: ItemId, id: ItemId, dx: f64, dy: f64 },
    Align { board_id: ItemId, ids: Vec<ItemId>, edge: AlignEdge, grid: Option<f64> },
    Distribute { board_id: ItemId, ids: Vec<ItemId>, axis: DistributeAxis },
}

impl Command {
    /// Convert a canvas commit into a store command.
    ///
    /// Selection, cursor and render notifications have no store counterpart.
    #[must_use]
    pub fn from_action(board_id: &str, action: &Action) -> Option<Self> {
        let board_id = board_id.to_owned();
        match action {
            Action::ItemUpdated { id, rect } => Some(Self::UpdateItem { board_id, id: id.clone(), rect: *rect }),
            Action::ItemDeleted { id } => Some(Self::DeleteItem { board_id, id: id.clone() }),
            Action::GroupCreated(group) | Action::GroupUpdated(group) => {
                Some(Self::PutGroup { board_id, group: group.clone() })
            }
            Action::GroupDeleted { id } => Some(Self::Ungroup { board_id, id: id.clone() }),
            Action::SelectionChanged(_) | Action::SetCursor(_) | Action::RenderNeeded => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateBoard { .. } => "board:create",
            Self::RenameBoard { .. } => "board:rename",
            Self::DeleteBoard { .. } => "board:delete",
            Self::SetActiveBoard { .. } => "board:use",
            Self::SetViewMode { .. } => "board:view",
            Self::ClearBoard { .. } => "board:clear",
            Self::AddImage { .. } => "image:add",
            Self::AddNote { .. } => "note:add",
            Self::UpdateNoteText { .. } => "note:text",
            Self::UpdateNoteColor { .. } => "note:color",
            Self::MoveItem { .. } => "item:move",
            Self::ResizeItem { .. } => "item:resize",
            Self::UpdateItem { .. } => "item:update",
            Self::DeleteItem { .. } => "item:delete",
            Self::CreateGroup { .. } => "group:create",
            Self::PutGroup { .. } => "group:put",
            Self::RenameGroup { .. } => "group:rename",
            Self::Ungroup { .. } => "group:ungroup",
            Self::DeleteGroup { .. } => "group:delete",
            Self::SetGroupDirection { .. } => "group:direction",
            Self::SetGroupGap { .. } => "group:gap",
            Self::TranslateGroup { .. } => "group:move",
            Self::Align { .. } => "align",
            Self::Distribute { .. } => "distribute",
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Owner of the current snapshot and its unsaved-changes flag.
#[derive(Debug)]
pub struct BoardStore {
    snapshot: Arc<Snapshot>,
    dirty: bool,
}

impl BoardStore {
    /// Start from a loaded snapshot. The store begins clean.
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot: Arc::new(snapshot), dirty: false }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Apply `command`, returning the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when the command refers to something missing or
    /// fails validation. The current snapshot is unchanged in that case.
    pub fn apply(&mut self, command: Command) -> Result<Arc<Snapshot>, BoardError> {
        let name = command.name();
        let mut next = (*self.snapshot).clone();
        apply_command(&mut next, command)?;
        let next = Arc::new(next);
        self.snapshot = Arc::clone(&next);
        self.dirty = true;
        debug!(command = name, "board command applied");
        Ok(next)
    }

    /// Forward a canvas action for `board_id`.
    ///
    /// Returns `Ok(None)` for actions without a store counterpart, and for a
    /// group removal the store already performed while deleting its last
    /// member.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when the converted command fails.
    pub fn apply_action(&mut self, board_id: &str, action: &Action) -> Result<Option<Arc<Snapshot>>, BoardError> {
        let Some(command) = Command::from_action(board_id, action) else {
            return Ok(None);
        };
        match self.apply(command) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(BoardError::GroupNotFound(_)) if matches!(action, Action::GroupDeleted { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether changes were applied since the last successful save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that `saved` reached storage. Clears the dirty flag only if no
    /// command was applied after `saved` was taken.
    pub fn mark_saved(&mut self, saved: &Arc<Snapshot>) {
        if Arc::ptr_eq(saved, &self.snapshot) {
            self.dirty = false;
        }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

fn apply_command(snapshot: &mut Snapshot, command: Command) -> Result<(), BoardError> {
    match command {
        Command::CreateBoard { id, name, created_at } => {
            let name = validate_board_name(&name)?;
            if snapshot.board(&id).is_some() {
                return Err(BoardError::DuplicateId(id));
            }
            let mut board = Board::new(id.clone(), name, created_at);
            board.view_mode = ViewMode::Freeform;
            snapshot.boards.push(board);
            snapshot.active_board_id = Some(id);
            Ok(())
        }
        Command::RenameBoard { board_id, name } => {
            let name = validate_board_name(&name)?;
            board_mut(snapshot, &board_id)?.name = name;
            Ok(())
        }
        Command::DeleteBoard { board_id } => {
            let Some(pos) = snapshot.boards.iter().position(|b| b.id == board_id) else {
                return Err(BoardError::BoardNotFound(board_id));
            };
            if snapshot.boards.len() == 1 {
                return Err(BoardError::LastBoard);
            }
            snapshot.boards.remove(pos);
            if snapshot.active_board_id.as_deref() == Some(board_id.as_str()) {
                snapshot.active_board_id = snapshot.boards.first().map(|b| b.id.clone());
            }
            Ok(())
        }
        Command::SetActiveBoard { board_id } => {
            if snapshot.board(&board_id).is_none() {
                return Err(BoardError::BoardNotFound(board_id));
            }
            snapshot.active_board_id = Some(board_id);
            Ok(())
        }
        Command::SetViewMode { board_id, view_mode } => {
            board_mut(snapshot, &board_id)?.view_mode = view_mode;
            Ok(())
        }
        Command::ClearBoard { board_id } => {
            board_mut(snapshot, &board_id)?.clear();
            Ok(())
        }
        Command::AddImage { board_id, image } => {
            let board = board_mut(snapshot, &board_id)?;
            ensure_new_item(board, &image.id)?;
            ensure_size(image.width, image.height)?;
            board.add_image(image);
            Ok(())
        }
        Command::AddNote { board_id, mut note } => {
            let board = board_mut(snapshot, &board_id)?;
            ensure_new_item(board, &note.id)?;
            ensure_size(note.width, note.height)?;
            note.color = resolve_note_color(&note.color)
                .ok_or_else(|| BoardError::InvalidColor(note.color.clone()))?
                .to_owned();
            board.add_note(note);
            Ok(())
        }
        Command::UpdateNoteText { board_id, id, text } => {
            let board = board_mut(snapshot, &board_id)?;
            if !board.set_note_text(&id, &text) {
                return Err(BoardError::NoteNotFound(id));
            }
            Ok(())
        }
        Command::UpdateNoteColor { board_id, id, color } => {
            let board = board_mut(snapshot, &board_id)?;
            let Some(fill) = resolve_note_color(&color) else {
                return Err(BoardError::InvalidColor(color));
            };
            if !board.set_note_color(&id, fill) {
                return Err(BoardError::NoteNotFound(id));
            }
            Ok(())
        }
        Command::MoveItem { board_id, id, x, y } => {
            let board = board_mut(snapshot, &board_id)?;
            if !board.set_item_position(&id, x, y) {
                return Err(BoardError::ItemNotFound(id));
            }
            Ok(())
        }
        Command::ResizeItem { board_id, id, width, height } => {
            let board = board_mut(snapshot, &board_id)?;
            resize(board, &id, width, height)
        }
        Command::UpdateItem { board_id, id, rect } => {
            let board = board_mut(snapshot, &board_id)?;
            resize(board, &id, rect.width, rect.height)?;
            board.set_item_position(&id, rect.x, rect.y);
            Ok(())
        }
        Command::DeleteItem { board_id, id } => {
            let board = board_mut(snapshot, &board_id)?;
            if !board.remove_item(&id) {
                return Err(BoardError::ItemNotFound(id));
            }
            Ok(())
        }
        Command::CreateGroup { board_id, group_id, name, item_ids } => {
            let board = board_mut(snapshot, &board_id)?;
            if board.group(&group_id).is_some() {
                return Err(BoardError::DuplicateId(group_id));
            }
            if let Some(missing) = item_ids.iter().find(|id| board.item_kind(id).is_none()) {
                return Err(BoardError::ItemNotFound(missing.clone()));
            }
            board.create_group(group_id, &name, &item_ids)?;
            Ok(())
        }
        Command::PutGroup { board_id, group } => {
            board_mut(snapshot, &board_id)?.put_group(group);
            Ok(())
        }
        Command::RenameGroup { board_id, id, name } => {
            if name.trim().chars().count() < GROUP_NAME_MIN_LEN {
                return Err(BoardError::InvalidGroupName);
            }
            let board = board_mut(snapshot, &board_id)?;
            if !board.rename_group(&id, &name) {
                return Err(BoardError::GroupNotFound(id));
            }
            Ok(())
        }
        Command::Ungroup { board_id, id } => {
            let board = board_mut(snapshot, &board_id)?;
            if !board.ungroup(&id) {
                return Err(BoardError::GroupNotFound(id));
            }
            Ok(())
        }
        Command::DeleteGroup { board_id, id } => {
            let board = board_mut(snapshot, &board_id)?;
            if !board.delete_group(&id) {
                return Err(BoardError::GroupNotFound(id));
            }
            Ok(())
        }
        Command::SetGroupDirection { board_id, id, direction } => {
            let board = board_mut(snapshot, &board_id)?;
            ensure_group(board, &id)?;
            board.set_group_direction(&id, direction);
            Ok(())
        }
        Command::SetGroupGap { board_id, id, gap } => {
            let board = board_mut(snapshot, &board_id)?;
            ensure_group(board, &id)?;
            board.set_group_gap(&id, gap);
            Ok(())
        }
        Command::TranslateGroup { board_id, id, dx, dy } => {
            let board = board_mut(snapshot, &board_id)?;
            if !layout::translate_group(board, &id, dx, dy) {
                return Err(BoardError::GroupNotFound(id));
            }
            Ok(())
        }
        Command::Align { board_id, ids, edge, grid } => {
            let board = board_mut(snapshot, &board_id)?;
            let boxes = existing_boxes(board, &ids)?;
            apply_moves(board, &align::align(&boxes, edge, grid));
            Ok(())
        }
        Command::Distribute { board_id, ids, axis } => {
            let board = board_mut(snapshot, &board_id)?;
            let boxes = existing_boxes(board, &ids)?;
            apply_moves(board, &align::distribute(&boxes, axis));
            Ok(())
        }
    }
}

fn board_mut<'a>(snapshot: &'a mut Snapshot, id: &str) -> Result<&'a mut Board, BoardError> {
    snapshot
        .boards
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| BoardError::BoardNotFound(id.to_owned()))
}

/// Trimmed board name, or `InvalidBoardName` when too short.
fn validate_board_name(name: &str) -> Result<String, BoardError> {
    let name = name.trim();
    if name.chars().count() < BOARD_NAME_MIN_LEN {
        return Err(BoardError::InvalidBoardName);
    }
    Ok(name.to_owned())
}

fn ensure_new_item(board: &Board, id: &str) -> Result<(), BoardError> {
    if board.item_kind(id).is_some() {
        return Err(BoardError::DuplicateId(id.to_owned()));
    }
    Ok(())
}

fn ensure_group(board: &Board, id: &str) -> Result<(), BoardError> {
    if board.group(id).is_none() {
        return Err(BoardError::GroupNotFound(id.to_owned()));
    }
    Ok(())
}

fn ensure_size(width: f64, height: f64) -> Result<(), BoardError> {
    if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        Ok(())
    } else {
        Err(BoardError::InvalidSize { width, height })
    }
}

fn resize(board: &mut Board, id: &str, width: f64, height: f64) -> Result<(), BoardError> {
    if board.item_kind(id).is_none() {
        return Err(BoardError::ItemNotFound(id.to_owned()));
    }
    if !board.set_item_size(id, width, height) {
        return Err(BoardError::InvalidSize { width, height });
    }
    Ok(())
}

/// Boxes for `ids` in the given order; every id must exist.
fn existing_boxes(board: &Board, ids: &[ItemId]) -> Result<Vec<ItemBox>, BoardError> {
    ids.iter()
        .map(|id| {
            board
                .boxes_for(std::iter::once(id))
                .into_iter()
                .next()
                .ok_or_else(|| BoardError::ItemNotFound(id.clone()))
        })
        .collect()
}

fn apply_moves(board: &mut Board, moves: &[ItemMove]) {
    for m in moves {
        board.set_item_position(&m.id, m.x, m.y);
    }
}
