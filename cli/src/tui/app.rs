use std::cell::Cell;
use std::rc::Rc;

use ratatui::widgets::TableState;
use todolite_core::{
    Change, FileKeyValueStore, Filter, Finish, LoadReport, Outcome, Task, TaskError, TaskId,
    TodoState,
};

use crate::RECOVERED_MESSAGE;

pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

pub struct App {
    pub state: TodoState<FileKeyValueStore>,
    pub table: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
    // Ids of the rows on screen, in order.
    pub visible: Vec<TaskId>,
    dirty: Rc<Cell<bool>>,
}

impl App {
    pub fn new(mut state: TodoState<FileKeyValueStore>, report: LoadReport) -> App {
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        state.subscribe(Rc::new(move |_: Change| flag.set(true)));

        let status = match report {
            LoadReport::Recovered => Some(RECOVERED_MESSAGE.to_string()),
            LoadReport::Restored { dropped, .. } if dropped > 0 => {
                Some(format!("Skipped {} unreadable task(s)", dropped))
            }
            _ => None,
        };

        let mut app = App {
            state,
            table: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status,
            visible: Vec::new(),
            dirty,
        };
        app.refresh_if_dirty();
        app
    }

    /// Re-derives the visible rows after a change signal.
    pub fn refresh_if_dirty(&mut self) {
        if !self.dirty.replace(false) {
            return;
        }
        let selected_id = self.selected_id().cloned();
        self.visible = self.state.visible().iter().map(|t| t.id.clone()).collect();

        let index = selected_id
            .and_then(|id| self.visible.iter().position(|v| *v == id))
            .or_else(|| self.table.selected())
            .map(|i| i.min(self.visible.len().saturating_sub(1)));
        self.table
            .select(if self.visible.is_empty() { None } else { index.or(Some(0)) });
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.state.visible()
    }

    pub fn selected_id(&self) -> Option<&TaskId> {
        self.table.selected().and_then(|i| self.visible.get(i))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_id().and_then(|id| self.state.store().get(id))
    }

    pub fn next(&mut self) {
        if self.visible.is_empty() { return; }

        let i = match self.table.selected() {
            Some(i) => {
                if i >= self.visible.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible.is_empty() { return; }

        let i = match self.table.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id().cloned() {
            let result = self.state.toggle(&id);
            self.report(result);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id().cloned() {
            let result = self.state.delete(&id);
            self.report(result);
        }
    }

    pub fn clear_completed(&mut self) {
        match self.state.clear_completed() {
            Ok(removed) => self.status = Some(format!("Cleared {} completed task(s)", removed)),
            Err(err) => self.status = Some(format!("Not saved: {}", err)),
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.state.set_filter(filter);
    }

    pub fn cycle_filter(&mut self) {
        let next = self.state.filter().next();
        self.state.set_filter(next);
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn start_edit(&mut self) {
        let Some(id) = self.selected_id().cloned() else { return };
        match self.state.start_edit(&id) {
            Ok(true) => {
                self.input_mode = InputMode::Editing;
                self.cursor_position = self.state.edit_session().draft().map_or(0, |d| d.chars().count());
            }
            Ok(false) => {}
            Err(err) => self.status = Some(format!("Not saved: {}", err)),
        }
    }

    /// Enter in the input line.
    pub fn submit(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Editing => self.commit_edit(),
            InputMode::Normal => {}
        }
    }

    /// Esc in the input line.
    pub fn cancel(&mut self) {
        if let InputMode::Editing = self.input_mode {
            if let Some(id) = self.state.edit_session().editing_id().cloned() {
                self.state.cancel_edit(&id);
            }
        }
        self.exit_input_mode();
    }

    /// Focus leaving the input line: an edit commits, an add is abandoned.
    pub fn blur(&mut self) {
        match self.input_mode {
            InputMode::Editing => self.commit_edit(),
            _ => self.exit_input_mode(),
        }
    }

    fn submit_add(&mut self) {
        let result = self.state.add(&self.input);
        // A failed save still leaves the task in the list; keeping the text
        // would let a second Enter add it twice.
        let added = matches!(
            result,
            Ok(Outcome::Applied(_)) | Err(TaskError::Persist { applied: Some(_), .. })
        );
        if added {
            // Newest task is first; keep the input open for the next one.
            self.refresh_if_dirty();
            if !self.visible.is_empty() {
                self.table.select(Some(0));
            }
            self.input.clear();
            self.cursor_position = 0;
        }
        self.report(result);
    }

    fn commit_edit(&mut self) {
        if let Some(id) = self.state.edit_session().editing_id().cloned() {
            match self.state.commit_edit(&id) {
                Ok(Finish::Discarded) => self.status = Some("Edit discarded".to_string()),
                Ok(_) => {}
                Err(err) => self.status = Some(format!("Not saved: {}", err)),
            }
        }
        self.exit_input_mode();
    }

    fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.cursor_position = 0;
    }

    fn report<T>(&mut self, result: todolite_core::error::Result<Outcome<T>>) {
        match result {
            Ok(Outcome::Applied(_)) => self.status = None,
            Ok(Outcome::Ignored(reason)) => self.status = Some(format!("Nothing changed: {}", reason)),
            Err(err) => self.status = Some(format!("Not saved: {}", err)),
        }
    }

    /// Text currently shown in the input line.
    pub fn input_text(&self) -> &str {
        match self.input_mode {
            InputMode::Adding => self.input.as_str(),
            InputMode::Editing => self.state.edit_session().draft().unwrap_or(""),
            InputMode::Normal => "",
        }
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.input_mode {
            InputMode::Adding => Some(&mut self.input),
            InputMode::Editing => self.state.edit_session_mut().draft_mut(),
            InputMode::Normal => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        if let Some(buffer) = self.active_buffer() {
            let byte_index = byte_index(buffer, cursor);
            buffer.insert(byte_index, c);
            self.cursor_position += 1;
        }
    }

    pub fn delete_char(&mut self) {
        let cursor = self.cursor_position;
        if cursor == 0 { return; }
        if let Some(buffer) = self.active_buffer() {
            let byte_index = byte_index(buffer, cursor - 1);
            buffer.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input_text().chars().count() {
            self.cursor_position += 1;
        }
    }
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.chars().take(char_index).map(|c| c.len_utf8()).sum()
}
