use crate::error::Result;
use crate::model::filter::Filter;
use crate::model::task::Task;
use crate::signal::{Change, Listener, Signal, Subscription};

/// Current view filter. Starts at [`Filter::All`].
#[derive(Debug, Default)]
pub struct FilterSelector {
    current: Filter,
    signal: Signal,
}

impl FilterSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Filter {
        self.current
    }

    pub fn subscribe(&mut self, listener: Listener) -> Subscription {
        self.signal.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.signal.unsubscribe(subscription)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.current = filter;
        self.signal.emit(Change::Filter);
    }

    /// Parses and applies a filter name. Unknown names fail with
    /// `InvalidFilter` and leave the current filter untouched.
    pub fn set_filter_str(&mut self, value: &str) -> Result<()> {
        let filter = value.parse::<Filter>()?;
        self.set_filter(filter);
        Ok(())
    }

    pub fn derive_visible<'a>(&self, all_tasks: &'a [Task]) -> Vec<&'a Task> {
        derive_visible(all_tasks, self.current)
    }
}

/// Ordered subsequence of `all_tasks` matching `filter`.
pub fn derive_visible(all_tasks: &[Task], filter: Filter) -> Vec<&Task> {
    all_tasks.iter().filter(|t| filter.matches(t)).collect()
}
