//! Test fixtures and helpers.

use chrono::NaiveDate;
use todosync_model::{Todo, TodoDraft};

/// Initializes tracing for tests, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A saved todo with the given id and title and all other fields unset.
pub fn todo(id: &str, title: &str) -> Todo {
    Todo {
        id: Some(id.to_string()),
        title: title.to_string(),
        description: None,
        completed: false,
        due_date: None,
    }
}

/// A valid draft with the given title.
pub fn draft(title: &str) -> TodoDraft {
    TodoDraft::new(title)
}

/// A fixed date for deterministic due-date tests.
pub fn due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

/// Three sample items with mixed completion states.
pub fn sample_todos() -> Vec<Todo> {
    let mut groceries = todo("t1", "Buy groceries");
    groceries.description = Some("Milk, eggs, and bread".to_string());

    let mut taxes = todo("t2", "File taxes");
    taxes.completed = true;
    taxes.due_date = Some(due_date());

    let plants = todo("t3", "Water the plants");

    vec![groceries, taxes, plants]
}
