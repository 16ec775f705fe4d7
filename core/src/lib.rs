pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod signal;

pub use config::{StoreConfig, Variant};
pub use error::{Ignored, StorageError, TaskError};
pub use input::{expand_id, join_words};
pub use model::filter::Filter;
pub use model::task::{Task, TaskId};
pub use repository::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use service::edit_session::{EditSession, EditState, Finish};
pub use service::filter_selector::{derive_visible, FilterSelector};
pub use service::task_store::{LoadReport, Outcome, TaskCounts, TaskStore};
pub use service::todo_state::TodoState;
pub use signal::{Change, Signal, Subscription};
