pub mod edit_session;
pub mod filter_selector;
pub mod task_store;
pub mod todo_state;
