//! Inline edit of a single task's text.
//!
//! `Idle` or `Editing { id, draft }`. Commit and cancel are both terminal and
//! are guarded by the task id they were dispatched for, so whichever arrives
//! first wins and the other finds the session idle and does nothing.

use tracing::debug;

use crate::error::Result;
use crate::model::task::{normalize_text, TaskId};
use crate::repository::KeyValueStore;
use crate::service::task_store::{Outcome, TaskStore};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing { id: TaskId, draft: String },
}

/// How a commit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// The draft was written to the store.
    Saved,
    /// Empty draft, or the task vanished while editing.
    Discarded,
    /// Not editing that task; nothing happened.
    NotEditing,
}

#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<&TaskId> {
        match &self.state {
            EditState::Editing { id, .. } => Some(id),
            EditState::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut String> {
        match &mut self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Replaces the draft. Returns false when idle.
    pub fn set_draft(&mut self, text: &str) -> bool {
        match self.draft_mut() {
            Some(draft) => {
                *draft = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Opens a session on `id` seeded with its current text.
    ///
    /// An active session is committed first. Returns false, staying idle,
    /// when `id` is not in the store. A persist failure from the implicit
    /// commit is returned after the new session has been opened.
    pub fn start<R: KeyValueStore>(&mut self, store: &mut TaskStore<R>, id: &TaskId) -> Result<bool> {
        let previous = match self.editing_id().cloned() {
            Some(active) => self.commit(store, &active).map(|_| ()),
            None => Ok(()),
        };

        let Some(task) = store.get(id) else {
            debug!(id = %id, "refusing to edit a missing task");
            previous?;
            return Ok(false);
        };

        self.state = EditState::Editing {
            id: id.clone(),
            draft: task.text.clone(),
        };
        previous?;
        Ok(true)
    }

    /// Writes the trimmed draft if non-empty, then returns to idle.
    pub fn commit<R: KeyValueStore>(&mut self, store: &mut TaskStore<R>, id: &TaskId) -> Result<Finish> {
        if self.editing_id() != Some(id) {
            return Ok(Finish::NotEditing);
        }
        let EditState::Editing { id, draft } = std::mem::take(&mut self.state) else {
            return Ok(Finish::NotEditing);
        };

        if normalize_text(&draft).is_none() {
            debug!(id = %id, "discarding empty draft");
            return Ok(Finish::Discarded);
        }

        match store.update(&id, &draft)? {
            Outcome::Applied(()) => Ok(Finish::Saved),
            Outcome::Ignored(reason) => {
                debug!(id = %id, %reason, "draft not saved");
                Ok(Finish::Discarded)
            }
        }
    }

    /// Drops the draft. Returns false when not editing `id`.
    pub fn cancel(&mut self, id: &TaskId) -> bool {
        if self.editing_id() != Some(id) {
            return false;
        }
        self.state = EditState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::repository::MemoryKeyValueStore;

    fn store_with(texts: &[&str]) -> (TaskStore<MemoryKeyValueStore>, Vec<TaskId>) {
        let mut store = TaskStore::new(MemoryKeyValueStore::new(), Variant::Rich);
        let ids = texts
            .iter()
            .map(|t| store.add(t).unwrap().applied().unwrap())
            .collect();
        (store, ids)
    }

    #[test]
    fn test_start_missing_task_stays_idle() {
        let (mut store, _) = store_with(&["a"]);
        let mut session = EditSession::new();

        assert!(!session.start(&mut store, &TaskId::from("nope")).unwrap());
        assert_eq!(session.state(), &EditState::Idle);
    }

    #[test]
    fn test_cancel_then_commit_edits() {
        let (mut store, ids) = store_with(&["Buy milk"]);
        let id = &ids[0];
        let mut session = EditSession::new();

        assert!(session.start(&mut store, id).unwrap());
        assert_eq!(session.draft(), Some("Buy milk"));
        session.set_draft("Buy oat milk");
        assert!(session.cancel(id));
        assert!(!session.is_editing());
        assert_eq!(store.get(id).unwrap().text, "Buy milk");

        session.start(&mut store, id).unwrap();
        session.set_draft("  Buy oat milk ");
        assert_eq!(session.commit(&mut store, id).unwrap(), Finish::Saved);
        assert!(!session.is_editing());
        assert_eq!(store.get(id).unwrap().text, "Buy oat milk");
    }

    #[test]
    fn test_empty_draft_is_discarded() {
        let (mut store, ids) = store_with(&["keep me"]);
        let mut session = EditSession::new();

        session.start(&mut store, &ids[0]).unwrap();
        session.set_draft("   ");
        assert_eq!(session.commit(&mut store, &ids[0]).unwrap(), Finish::Discarded);
        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(store.get(&ids[0]).unwrap().text, "keep me");
    }

    #[test]
    fn test_blur_after_escape_is_noop() {
        let (mut store, ids) = store_with(&["original"]);
        let id = &ids[0];
        let mut session = EditSession::new();

        session.start(&mut store, id).unwrap();
        session.set_draft("changed");
        assert!(session.cancel(id));
        assert_eq!(session.commit(&mut store, id).unwrap(), Finish::NotEditing);
        assert_eq!(store.get(id).unwrap().text, "original");
    }

    #[test]
    fn test_escape_after_commit_is_noop() {
        let (mut store, ids) = store_with(&["original"]);
        let id = &ids[0];
        let mut session = EditSession::new();

        session.start(&mut store, id).unwrap();
        session.set_draft("changed");
        session.commit(&mut store, id).unwrap();
        assert!(!session.cancel(id));
        assert_eq!(store.get(id).unwrap().text, "changed");
    }

    #[test]
    fn test_starting_another_edit_commits_the_first() {
        let (mut store, ids) = store_with(&["one", "two"]);
        let mut session = EditSession::new();

        session.start(&mut store, &ids[0]).unwrap();
        session.set_draft("one, edited");
        assert!(session.start(&mut store, &ids[1]).unwrap());

        assert_eq!(store.get(&ids[0]).unwrap().text, "one, edited");
        assert_eq!(session.editing_id(), Some(&ids[1]));
        assert_eq!(session.draft(), Some("two"));
    }

    #[test]
    fn test_commit_for_other_id_is_ignored() {
        let (mut store, ids) = store_with(&["one", "two"]);
        let mut session = EditSession::new();

        session.start(&mut store, &ids[0]).unwrap();
        session.set_draft("edited");
        assert_eq!(session.commit(&mut store, &ids[1]).unwrap(), Finish::NotEditing);
        assert!(!session.cancel(&ids[1]));
        assert_eq!(session.editing_id(), Some(&ids[0]));
    }

    #[test]
    fn test_commit_after_task_deleted_discards() {
        let (mut store, ids) = store_with(&["doomed"]);
        let mut session = EditSession::new();

        session.start(&mut store, &ids[0]).unwrap();
        session.set_draft("too late");
        store.delete(&ids[0]).unwrap();

        assert_eq!(session.commit(&mut store, &ids[0]).unwrap(), Finish::Discarded);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_draft_when_idle() {
        let mut session = EditSession::new();
        assert!(!session.set_draft("anything"));
        assert_eq!(session.draft(), None);
    }
}
