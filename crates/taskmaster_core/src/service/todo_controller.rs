//! To-do list state controller.
//!
//! # Responsibility
//! - Hold the loaded item list, the input draft and the edit session.
//! - Turn presentation gestures into repository calls.
//!
//! # Invariants
//! - The item list is rebuilt from storage after every mutation.
//! - At most one item is in edit mode; starting a new edit abandons the
//!   previous uncommitted text.
//! - A blank edit commit leaves both storage and the edit session untouched.
//! - The controller performs no I/O besides repository calls.

use crate::model::item::{is_blank, Item, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoResult};
use log::debug;

/// Uncommitted edit of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub item_id: ItemId,
    pub text: String,
}

/// Display mode of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Viewing,
    Editing,
}

/// Application state controller over an item repository.
pub struct TodoController<R: ItemRepository> {
    repo: R,
    items: Vec<Item>,
    draft: String,
    editing: Option<EditSession>,
}

impl<R: ItemRepository> TodoController<R> {
    /// Creates a controller with an empty view. Call [`Self::load`] before use.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            items: Vec::new(),
            draft: String::new(),
            editing: None,
        }
    }

    /// Ensures the schema exists and loads the item list.
    pub fn load(&mut self) -> RepoResult<()> {
        self.repo.ensure_schema()?;
        self.refresh()
    }

    /// Reloads the full item list from storage.
    pub fn refresh(&mut self) -> RepoResult<()> {
        self.items = self.repo.list_all()?;
        debug!(
            "event=state_refresh module=controller status=ok item_count={}",
            self.items.len()
        );
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn row_mode(&self, id: ItemId) -> RowMode {
        match &self.editing {
            Some(session) if session.item_id == id => RowMode::Editing,
            _ => RowMode::Viewing,
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Creates an item from the current draft.
    ///
    /// A blank draft is left as-is and nothing is written.
    pub fn on_submit_draft(&mut self) -> RepoResult<()> {
        if is_blank(&self.draft) {
            return Ok(());
        }

        self.repo.create(&self.draft)?;
        self.draft.clear();
        self.refresh()
    }

    /// Replaces the draft with `text` and submits it.
    pub fn on_submit_draft_text(&mut self, text: impl Into<String>) -> RepoResult<()> {
        self.set_draft(text);
        self.on_submit_draft()
    }

    /// Flips `done` for a loaded item. Unknown ids are ignored.
    pub fn on_toggle(&mut self, id: ItemId) -> RepoResult<()> {
        let Some(current_done) = self.item(id).map(|item| item.done) else {
            debug!("event=item_toggle module=controller status=skipped item_id={id} reason=unknown_id");
            return Ok(());
        };

        self.repo.set_done(id, current_done)?;
        self.refresh()
    }

    pub fn on_delete(&mut self, id: ItemId) -> RepoResult<()> {
        self.repo.remove(id)?;
        if self.row_mode(id) == RowMode::Editing {
            self.editing = None;
        }
        self.refresh()
    }

    /// Enters edit mode for a loaded item, pre-filled with its value.
    ///
    /// Any other session is dropped without saving. Unknown ids are ignored.
    pub fn on_start_edit(&mut self, id: ItemId) {
        if let Some(item) = self.item(id) {
            self.editing = Some(EditSession {
                item_id: id,
                text: item.value.clone(),
            });
        }
    }

    /// Updates the uncommitted edit text. Ignored outside edit mode.
    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(session) = self.editing.as_mut() {
            session.text = text.into();
        }
    }

    /// Commits `text` as the new value of `id` and leaves edit mode.
    ///
    /// Blank text is a no-op that keeps the current edit session.
    pub fn on_commit_edit(&mut self, id: ItemId, text: &str) -> RepoResult<()> {
        if is_blank(text) {
            debug!("event=edit_commit module=controller status=skipped item_id={id} reason=blank_text");
            return Ok(());
        }

        self.repo.rename(id, text)?;
        self.editing = None;
        self.refresh()
    }

    /// Commits the current session's own text, if any.
    pub fn on_commit_current_edit(&mut self) -> RepoResult<()> {
        match self.editing.clone() {
            Some(session) => self.on_commit_edit(session.item_id, &session.text),
            None => Ok(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

#[cfg(test)]
mod tests {
    use super::{RowMode, TodoController};
    use crate::gateway::{NoopGateway, SqliteGateway};
    use crate::model::item::ItemId;
    use crate::repo::item_repo::GatewayItemRepository;

    fn controller() -> TodoController<GatewayItemRepository<SqliteGateway>> {
        let gateway = SqliteGateway::open_in_memory().unwrap();
        let mut controller = TodoController::new(GatewayItemRepository::new(gateway));
        controller.load().unwrap();
        controller
    }

    #[test]
    fn starting_second_edit_abandons_first_draft() {
        let mut controller = controller();
        controller.on_submit_draft_text("first").unwrap();
        controller.on_submit_draft_text("second").unwrap();

        controller.on_start_edit(ItemId(1));
        controller.set_edit_text("unsaved");
        controller.on_start_edit(ItemId(2));

        let session = controller.editing().unwrap();
        assert_eq!(session.item_id, ItemId(2));
        assert_eq!(session.text, "second");
        assert_eq!(controller.row_mode(ItemId(1)), RowMode::Viewing);
        assert_eq!(controller.row_mode(ItemId(2)), RowMode::Editing);
        assert_eq!(controller.item(ItemId(1)).unwrap().value, "first");
    }

    #[test]
    fn start_edit_on_unknown_id_is_ignored() {
        let mut controller = controller();
        controller.on_start_edit(ItemId(42));
        assert!(controller.editing().is_none());
    }

    #[test]
    fn deleting_edited_item_clears_session() {
        let mut controller = controller();
        controller.on_submit_draft_text("gone soon").unwrap();
        controller.on_start_edit(ItemId(1));
        controller.on_delete(ItemId(1)).unwrap();

        assert!(controller.editing().is_none());
        assert!(controller.items().is_empty());
    }

    #[test]
    fn noop_store_runs_every_gesture_without_error() {
        let mut controller = TodoController::new(GatewayItemRepository::new(NoopGateway::new()));
        controller.load().unwrap();
        controller.on_submit_draft_text("lost").unwrap();
        controller.on_toggle(ItemId(1)).unwrap();
        controller.on_commit_edit(ItemId(1), "renamed").unwrap();
        controller.on_delete(ItemId(1)).unwrap();

        assert!(controller.items().is_empty());
        assert_eq!(controller.draft(), "");
    }
}
