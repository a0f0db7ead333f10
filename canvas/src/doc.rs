//! Document model: boards, their images, notes and groups.
//!
//! This module defines the persisted shape of a board (`Board`, `ImageItem`,
//! `Note`, `Group`) together with the mutations every other layer goes
//! through. The wire format is camelCase JSON and matches what earlier
//! versions of the app stored, so documents without `groups` or `notes`
//! still load.
//!
//! Images and notes are both *items*: positioned, sized rectangles in canvas
//! space. Most of the canvas code only needs that view, exposed through
//! [`ItemBox`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::consts::{GROUP_DEFAULT_GAP, GROUP_NAME_MIN_LEN};
use crate::geom::{Rect, bounding_box};
use crate::layout;

/// Identifier of an image, note, group or board.
pub type ItemId = String;

/// Generate a fresh identifier such as `img-3f2c…`.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

fn unix_epoch() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH
}

/// How a board is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Freeform,
}

/// Axis along which a group lays out its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl LayoutDirection {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// An uploaded image placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    pub id: ItemId,
    /// Data URL (or any URL) of the image bytes.
    pub src: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees; stored but not edited by the canvas.
    #[serde(default)]
    pub rotation: f64,
}

/// A sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: ItemId,
    #[serde(default)]
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_note_color")]
    pub color: String,
    #[serde(with = "time::serde::rfc3339", default = "unix_epoch")]
    pub created_at: OffsetDateTime,
}

/// A named set of items laid out along one axis.
///
/// `image_ids` is a non-owning, ordered reference list. Membership is
/// exclusive: an item appears in at most one group of a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub image_ids: Vec<ItemId>,
    #[serde(default)]
    pub layout_direction: LayoutDirection,
    #[serde(default)]
    pub gap: f64,
    #[serde(default)]
    pub padding: f64,
    /// Layout origin (top-left anchor).
    pub x: f64,
    pub y: f64,
}

/// A board and everything on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageItem>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(with = "time::serde::rfc3339", default = "unix_epoch")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub view_mode: ViewMode,
}

/// Which collection an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Image,
    Note,
}

/// Geometry-only view of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBox {
    pub id: ItemId,
    pub kind: ItemKind,
    pub rect: Rect,
}

/// Why a group could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRejection {
    /// Trimmed name shorter than [`GROUP_NAME_MIN_LEN`].
    NameTooShort,
    /// Fewer than two existing items were given.
    TooFewItems,
}

// =============================================================
// Notes palette
// =============================================================

/// Note palette: `(name, fill, text color)`. The first entry is the default.
pub const NOTE_COLORS: [(&str, &str, &str); 6] = [
    ("Yellow", "#FEF3C7", "#92400E"),
    ("Blue", "#DBEAFE", "#1E3A8A"),
    ("Green", "#D1FAE5", "#065F46"),
    ("Pink", "#FCE7F3", "#831843"),
    ("Indigo", "#E0E7FF", "#3730A3"),
    ("Orange", "#FED7AA", "#92400E"),
];

fn default_note_color() -> String {
    NOTE_COLORS[0].1.to_owned()
}

/// Text color paired with a note fill; black for fills outside the palette.
#[must_use]
pub fn note_text_color(fill: &str) -> &'static str {
    NOTE_COLORS
        .iter()
        .find(|(_, value, _)| value.eq_ignore_ascii_case(fill))
        .map_or("#000000", |(_, _, text)| text)
}

/// Resolve a palette entry by name (case-insensitive) or by fill value.
#[must_use]
pub fn resolve_note_color(raw: &str) -> Option<&'static str> {
    NOTE_COLORS
        .iter()
        .find(|(name, value, _)| name.eq_ignore_ascii_case(raw) || value.eq_ignore_ascii_case(raw))
        .map(|(_, value, _)| *value)
}

impl Note {
    /// A new note with the default palette color.
    #[must_use]
    pub fn new(id: ItemId, text: String, rect: Rect, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            text,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color: default_note_color(),
            created_at,
        }
    }
}

impl ImageItem {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Note {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// =============================================================
// Board
// =============================================================

impl Board {
    /// An empty board.
    #[must_use]
    pub fn new(id: ItemId, name: String, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name,
            images: Vec::new(),
            groups: Vec::new(),
            notes: Vec::new(),
            created_at,
            view_mode: ViewMode::default(),
        }
    }

    // --- Queries ---

    /// Which collection holds `id`, if any.
    #[must_use]
    pub fn item_kind(&self, id: &str) -> Option<ItemKind> {
        if self.images.iter().any(|i| i.id == id) {
            Some(ItemKind::Image)
        } else if self.notes.iter().any(|n| n.id == id) {
            Some(ItemKind::Note)
        } else {
            None
        }
    }

    #[must_use]
    pub fn item_rect(&self, id: &str) -> Option<Rect> {
        self.images
            .iter()
            .find(|i| i.id == id)
            .map(ImageItem::rect)
            .or_else(|| self.notes.iter().find(|n| n.id == id).map(Note::rect))
    }

    /// All items in draw order: images first, then notes, each in insertion order.
    #[must_use]
    pub fn item_boxes(&self) -> Vec<ItemBox> {
        let images = self
            .images
            .iter()
            .map(|i| ItemBox { id: i.id.clone(), kind: ItemKind::Image, rect: i.rect() });
        let notes = self
            .notes
            .iter()
            .map(|n| ItemBox { id: n.id.clone(), kind: ItemKind::Note, rect: n.rect() });
        images.chain(notes).collect()
    }

    /// Geometry of the given items, skipping unknown ids, in the order given.
    #[must_use]
    pub fn boxes_for<'a, I>(&self, ids: I) -> Vec<ItemBox>
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        ids.into_iter()
            .filter_map(|id| {
                let kind = self.item_kind(id)?;
                let rect = self.item_rect(id)?;
                Some(ItemBox { id: id.clone(), kind, rect })
            })
            .collect()
    }

    /// Every item id on the board, in draw order.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.images
            .iter()
            .map(|i| i.id.clone())
            .chain(self.notes.iter().map(|n| n.id.clone()))
            .collect()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.images.len() + self.notes.len()
    }

    #[must_use]
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// The group containing `item_id`, if any.
    #[must_use]
    pub fn group_of(&self, item_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.image_ids.iter().any(|m| m == item_id))
    }

    #[must_use]
    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn image(&self, id: &str) -> Option<&ImageItem> {
        self.images.iter().find(|i| i.id == id)
    }

    // --- Item mutations ---

    pub fn add_image(&mut self, image: ImageItem) {
        self.images.push(image);
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Insert an image or replace the one with the same id.
    pub fn put_image(&mut self, image: ImageItem) {
        match self.images.iter_mut().find(|i| i.id == image.id) {
            Some(existing) => *existing = image,
            None => self.images.push(image),
        }
    }

    /// Insert a note or replace the one with the same id.
    pub fn put_note(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }

    pub fn set_note_text(&mut self, id: &str, text: &str) -> bool {
        let Some(note) = self.note_mut(id) else {
            return false;
        };
        text.clone_into(&mut note.text);
        true
    }

    /// Set a note's fill. Returns false for unknown notes.
    pub fn set_note_color(&mut self, id: &str, color: &str) -> bool {
        let Some(note) = self.note_mut(id) else {
            return false;
        };
        color.clone_into(&mut note.color);
        true
    }

    /// Move an item's top-left corner. Returns false for unknown ids.
    pub fn set_item_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        if let Some(img) = self.images.iter_mut().find(|i| i.id == id) {
            img.x = x;
            img.y = y;
            return true;
        }
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
            note.x = x;
            note.y = y;
            return true;
        }
        false
    }

    /// Resize an item. Non-positive sizes are rejected.
    pub fn set_item_size(&mut self, id: &str, width: f64, height: f64) -> bool {
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            return false;
        }
        if let Some(img) = self.images.iter_mut().find(|i| i.id == id) {
            img.width = width;
            img.height = height;
            return true;
        }
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
            note.width = width;
            note.height = height;
            return true;
        }
        false
    }

    /// Delete an item, detach it from its group and re-flow that group.
    ///
    /// A group left without members is removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.item_count();
        self.images.retain(|i| i.id != id);
        self.notes.retain(|n| n.id != id);
        if self.item_count() == before {
            return false;
        }
        self.detach_from_groups(&[id.to_owned()], None);
        true
    }

    /// Remove every item, note and group.
    pub fn clear(&mut self) {
        self.images.clear();
        self.notes.clear();
        self.groups.clear();
    }

    // --- Group mutations ---

    /// Create a group from existing items, anchored at their bounding box.
    ///
    /// Items already grouped elsewhere move to the new group; their old groups
    /// re-flow and are dropped if emptied. Unknown ids are ignored, and the
    /// remaining members are flowed in the order given.
    pub fn create_group(&mut self, id: ItemId, name: &str, item_ids: &[ItemId]) -> Result<&Group, GroupRejection> {
        let name = name.trim();
        if name.chars().count() < GROUP_NAME_MIN_LEN {
            return Err(GroupRejection::NameTooShort);
        }
        let mut members: Vec<ItemId> = Vec::new();
        for item_id in item_ids {
            if self.item_kind(item_id).is_some() && !members.contains(item_id) {
                members.push(item_id.clone());
            }
        }
        if members.len() < 2 {
            return Err(GroupRejection::TooFewItems);
        }
        let Some(bounds) = bounding_box(self.boxes_for(&members).into_iter().map(|b| b.rect)) else {
            return Err(GroupRejection::TooFewItems);
        };

        self.detach_from_groups(&members, None);
        self.groups.push(Group {
            id: id.clone(),
            name: name.to_owned(),
            image_ids: members,
            layout_direction: LayoutDirection::Horizontal,
            gap: GROUP_DEFAULT_GAP,
            padding: 0.0,
            x: bounds.x,
            y: bounds.y,
        });
        layout::arrange(self, &id);
        self.group(&id).ok_or(GroupRejection::TooFewItems)
    }

    /// Insert or replace a group by id, as received from elsewhere.
    ///
    /// Its members leave any other group first. The group itself is not
    /// re-flowed; member positions are expected to arrive separately.
    pub fn put_group(&mut self, group: Group) {
        self.detach_from_groups(&group.image_ids, Some(&group.id));
        match self.groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }

    /// Rename a group. Blank names are ignored.
    pub fn rename_group(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        name.clone_into(&mut group.name);
        true
    }

    /// Dissolve a group, leaving its members in place.
    pub fn ungroup(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        self.groups.len() != before
    }

    /// Remove a group together with all of its member items.
    pub fn delete_group(&mut self, id: &str) -> bool {
        let Some(pos) = self.groups.iter().position(|g| g.id == id) else {
            return false;
        };
        let group = self.groups.remove(pos);
        self.images.retain(|i| !group.image_ids.contains(&i.id));
        self.notes.retain(|n| !group.image_ids.contains(&n.id));
        true
    }

    /// Change the flow axis and re-flow.
    pub fn set_group_direction(&mut self, id: &str, direction: LayoutDirection) -> bool {
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        group.layout_direction = direction;
        layout::arrange(self, id)
    }

    /// Change the member gap (clamped to ≥ 0) and re-flow.
    pub fn set_group_gap(&mut self, id: &str, gap: f64) -> bool {
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        group.gap = if gap.is_finite() { gap.max(0.0) } else { 0.0 };
        layout::arrange(self, id)
    }

    /// Change the padding (clamped to ≥ 0) and re-flow.
    pub fn set_group_padding(&mut self, id: &str, padding: f64) -> bool {
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        group.padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        layout::arrange(self, id)
    }

    /// Drop `ids` from every group except `keep`, re-flow the groups that
    /// changed and garbage-collect the ones left empty.
    fn detach_from_groups(&mut self, ids: &[ItemId], keep: Option<&str>) {
        let mut touched: Vec<ItemId> = Vec::new();
        for group in &mut self.groups {
            if keep == Some(group.id.as_str()) {
                continue;
            }
            let before = group.image_ids.len();
            group.image_ids.retain(|m| !ids.contains(m));
            if group.image_ids.len() != before {
                touched.push(group.id.clone());
            }
        }
        self.groups.retain(|g| keep == Some(g.id.as_str()) || !g.image_ids.is_empty());
        for group_id in touched {
            layout::arrange(self, &group_id);
        }
    }
}
