use crate::config::Variant;
use crate::error::Result;
use crate::model::filter::Filter;
use crate::model::task::{Task, TaskId};
use crate::repository::KeyValueStore;
use crate::service::edit_session::{EditSession, Finish};
use crate::service::filter_selector::FilterSelector;
use crate::service::task_store::{LoadReport, Outcome, TaskStore};
use crate::signal::{Listener, Subscription};

/// The whole client state: one store, one filter, one edit session.
///
/// Built once at startup and handed to the presentation layer, which reads
/// [`TodoState::visible`] after every change signal.
pub struct TodoState<R: KeyValueStore> {
    store: TaskStore<R>,
    filter: FilterSelector,
    edit: EditSession,
}

impl<R: KeyValueStore> TodoState<R> {
    /// Wraps `repo` and loads the persisted tasks.
    pub fn open(repo: R, variant: Variant) -> Result<(Self, LoadReport)> {
        let mut store = TaskStore::new(repo, variant);
        let report = store.load()?;
        Ok((
            Self {
                store,
                filter: FilterSelector::new(),
                edit: EditSession::new(),
            },
            report,
        ))
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<R> {
        &mut self.store
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn edit_session_mut(&mut self) -> &mut EditSession {
        &mut self.edit
    }

    /// Registers `listener` for both task and filter changes.
    pub fn subscribe(&mut self, listener: Listener) -> (Subscription, Subscription) {
        let tasks = self.store.subscribe(listener.clone());
        let filter = self.filter.subscribe(listener);
        (tasks, filter)
    }

    pub fn snapshot(&self) -> &[Task] {
        self.store.snapshot()
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.filter.derive_visible(self.store.snapshot())
    }

    pub fn filter(&self) -> Filter {
        self.filter.current()
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter.set_filter(filter);
    }

    pub fn set_filter_str(&mut self, value: &str) -> Result<()> {
        self.filter.set_filter_str(value)
    }

    pub fn add(&mut self, raw_text: &str) -> Result<Outcome<TaskId>> {
        self.store.add(raw_text)
    }

    pub fn toggle(&mut self, id: &TaskId) -> Result<Outcome<bool>> {
        self.store.toggle(id)
    }

    pub fn delete(&mut self, id: &TaskId) -> Result<Outcome<Task>> {
        self.store.delete(id)
    }

    pub fn update(&mut self, id: &TaskId, new_text: &str) -> Result<Outcome<()>> {
        self.store.update(id, new_text)
    }

    pub fn clear_completed(&mut self) -> Result<usize> {
        self.store.clear_completed()
    }

    pub fn start_edit(&mut self, id: &TaskId) -> Result<bool> {
        self.edit.start(&mut self.store, id)
    }

    pub fn commit_edit(&mut self, id: &TaskId) -> Result<Finish> {
        self.edit.commit(&mut self.store, id)
    }

    pub fn cancel_edit(&mut self, id: &TaskId) -> bool {
        self.edit.cancel(id)
    }
}
