//! Item domain model.
//!
//! # Responsibility
//! - Define the `Item` record persisted in the `items` table.
//! - Provide the blank-text rule used by create and rename paths.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - `value` is stored trimmed and is never empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned primary key of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Persisted as `0`/`1` in `items.done`.
    pub done: bool,
    pub value: String,
}

/// Validation errors for item records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    BlankValue,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankValue => write!(f, "item value must not be blank"),
        }
    }
}

impl Error for ItemValidationError {}

impl Item {
    /// Creates an item record with `done = false`.
    pub fn new(id: ItemId, value: impl Into<String>) -> Self {
        Self {
            id,
            done: false,
            value: value.into(),
        }
    }

    /// Checks the record against persisted-state invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if is_blank(&self.value) {
            return Err(ItemValidationError::BlankValue);
        }
        Ok(())
    }
}

/// Returns whether `text` is empty after trimming.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Returns the trimmed text to persist, or `None` for blank input.
pub fn normalize_item_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
