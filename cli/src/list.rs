use chrono::{DateTime, Local, Utc};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use todolite_core::{Filter, Task, TaskCounts};

pub const EMPTY_MESSAGE: &str = "No tasks, add your first one!";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Created")]
    created: String,
}

pub fn format_created(created_at: Option<DateTime<Utc>>) -> String {
    created_at
        .map(|dt| DateTime::<Local>::from(dt).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn show_tasks(visible: &[&Task], filter: Filter, counts: TaskCounts) {
    if visible.is_empty() {
        println!("{}", EMPTY_MESSAGE);
    } else {
        let rows: Vec<TaskRow> = visible
            .iter()
            .map(|task| TaskRow {
                id: task.id.short().to_string(),
                done: if task.completed { "[x]" } else { "[ ]" },
                text: task.text.clone(),
                created: format_created(task.created_at),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
        println!("{}", table);
    }

    println!(
        "{} active, {} completed (filter: {})",
        counts.active, counts.completed, filter
    );
}
