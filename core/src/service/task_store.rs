//! Canonical task list and its synchronization with the key-value store.
//!
//! Every applied mutation persists the whole sequence and then emits
//! [`Change::Tasks`]. A failed persist keeps the in-memory change; the next
//! successful persist reconciles storage.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::Variant;
use crate::error::{Ignored, Result, TaskError};
use crate::input::expand_id;
use crate::model::task::{normalize_text, Task, TaskId};
use crate::repository::KeyValueStore;
use crate::signal::{Change, Listener, Signal, Subscription};

/// Result of a mutation that may legitimately do nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Applied(T),
    Ignored(Ignored),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Ignored(_) => None,
        }
    }

    pub fn ignored(&self) -> Option<&Ignored> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Ignored(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// Nothing persisted yet.
    Empty,
    /// `dropped` counts records discarded for empty text or a repeated id.
    Restored { count: usize, dropped: usize },
    /// The blob was malformed and the store started empty.
    Recovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub active: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn total(&self) -> usize {
        self.active + self.completed
    }
}

pub struct TaskStore<R: KeyValueStore> {
    repo: R,
    variant: Variant,
    tasks: Vec<Task>,
    signal: Signal,
}

impl<R: KeyValueStore> TaskStore<R> {
    /// Creates an empty store. Call [`TaskStore::load`] to read persisted tasks.
    pub fn new(repo: R, variant: Variant) -> Self {
        Self {
            repo,
            variant,
            tasks: Vec::new(),
            signal: Signal::new(),
        }
    }

    pub fn storage_key(&self) -> &'static str {
        self.variant.storage_key()
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn subscribe(&mut self, listener: Listener) -> Subscription {
        self.signal.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.signal.unsubscribe(subscription)
    }

    /// Replaces the in-memory sequence with the persisted one.
    ///
    /// Malformed data never fails the load: it is logged and the store
    /// starts empty. Only a storage read failure is returned.
    pub fn load(&mut self) -> Result<LoadReport> {
        let key = self.storage_key();
        let raw = self.repo.get(key).map_err(|source| TaskError::Storage {
            key: key.to_string(),
            source,
        })?;

        let report = match raw {
            None => {
                self.tasks = Vec::new();
                LoadReport::Empty
            }
            Some(raw) => match decode_tasks(key, &raw) {
                Ok((tasks, dropped)) => {
                    let count = tasks.len();
                    self.tasks = tasks;
                    LoadReport::Restored { count, dropped }
                }
                Err(err) => {
                    warn!(error = %err, "resetting to an empty task list");
                    self.tasks = Vec::new();
                    LoadReport::Recovered
                }
            },
        };

        info!(key, ?report, "loaded tasks");
        self.signal.emit(Change::Tasks);
        Ok(report)
    }

    /// Writes the current sequence under the variant's key.
    pub fn save(&mut self) -> Result<()> {
        let key = self.storage_key();
        let blob = encode_tasks(&self.tasks, self.variant).map_err(TaskError::Encode)?;
        self.repo
            .set(key, &blob)
            .map_err(|source| TaskError::Persist {
                key: key.to_string(),
                source,
                applied: None,
            })
    }

    /// Read-only view of the ordered sequence, newest first.
    pub fn snapshot(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskCounts {
            active: self.tasks.len() - completed,
            completed,
        }
    }

    /// Resolves a full id or a unique id prefix.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<TaskId> {
        expand_id(prefix, self.tasks.iter().map(|t| &t.id))
    }

    pub fn add(&mut self, raw_text: &str) -> Result<Outcome<TaskId>> {
        let Some(text) = normalize_text(raw_text) else {
            return Ok(Outcome::Ignored(Ignored::EmptyText));
        };

        let id = self.fresh_id();
        let mut task = Task::new(id.clone(), text);
        if !self.variant.records_timestamps() {
            task.created_at = None;
        }
        self.tasks.insert(0, task);
        debug!(id = %id, "added task");
        match self.commit() {
            Ok(()) => Ok(Outcome::Applied(id)),
            Err(TaskError::Persist { key, source, .. }) => Err(TaskError::Persist {
                key,
                source,
                applied: Some(id),
            }),
            Err(err) => Err(err),
        }
    }

    /// Flips `completed`. Returns the new value.
    pub fn toggle(&mut self, id: &TaskId) -> Result<Outcome<bool>> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == *id) else {
            return Ok(Outcome::Ignored(Ignored::TaskNotFound(id.clone())));
        };

        task.completed = !task.completed;
        let completed = task.completed;
        debug!(id = %id, completed, "toggled task");
        self.commit()?;
        Ok(Outcome::Applied(completed))
    }

    /// Removes the task and hands it back.
    pub fn delete(&mut self, id: &TaskId) -> Result<Outcome<Task>> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == *id) else {
            return Ok(Outcome::Ignored(Ignored::TaskNotFound(id.clone())));
        };

        let removed = self.tasks.remove(pos);
        debug!(id = %id, "deleted task");
        self.commit()?;
        Ok(Outcome::Applied(removed))
    }

    pub fn update(&mut self, id: &TaskId, new_text: &str) -> Result<Outcome<()>> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == *id) else {
            return Ok(Outcome::Ignored(Ignored::TaskNotFound(id.clone())));
        };
        let Some(text) = normalize_text(new_text) else {
            return Ok(Outcome::Ignored(Ignored::EmptyText));
        };

        self.tasks[pos].text = text;
        debug!(id = %id, "updated task text");
        self.commit()?;
        Ok(Outcome::Applied(()))
    }

    /// Drops every completed task. Persists and signals even when nothing
    /// was removed. Returns the number removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        debug!(removed, "cleared completed tasks");
        self.commit()?;
        Ok(removed)
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    // Persist, then signal regardless of the persist result.
    fn commit(&mut self) -> Result<()> {
        let saved = self.save();
        if let Err(err) = &saved {
            error!(error = %err, "persist failed; continuing with in-memory state");
        }
        self.signal.emit(Change::Tasks);
        saved
    }
}

#[derive(Serialize)]
struct MinimalRecord<'a> {
    id: &'a TaskId,
    text: &'a str,
    completed: bool,
}

pub(crate) fn encode_tasks(tasks: &[Task], variant: Variant) -> serde_json::Result<String> {
    if variant.records_timestamps() {
        serde_json::to_string(tasks)
    } else {
        let records: Vec<MinimalRecord<'_>> = tasks
            .iter()
            .map(|t| MinimalRecord {
                id: &t.id,
                text: &t.text,
                completed: t.completed,
            })
            .collect();
        serde_json::to_string(&records)
    }
}

/// Parses a persisted blob and restores the text and id invariants.
pub(crate) fn decode_tasks(key: &str, raw: &str) -> Result<(Vec<Task>, usize)> {
    let records: Vec<Task> =
        serde_json::from_str(raw).map_err(|source| TaskError::MalformedStorage {
            key: key.to_string(),
            source,
        })?;

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for mut task in records {
        let Some(text) = normalize_text(&task.text) else {
            warn!(id = %task.id, "dropping persisted task with empty text");
            dropped += 1;
            continue;
        };
        if !seen.insert(task.id.clone()) {
            warn!(id = %task.id, "dropping persisted task with duplicate id");
            dropped += 1;
            continue;
        }
        task.text = text;
        tasks.push(task);
    }
    Ok((tasks, dropped))
}
