//! In-memory REST backend for tests.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use todosync_client::{ClientError, ClientResult, RestTransport};
use todosync_model::{Todo, TodoDraft, TodoPatch};
use uuid::Uuid;

/// An in-memory stand-in for the remote REST API.
///
/// Behaves like the real backend: assigns ids on create, merges patches
/// server-side, filters on `completed`, and treats deleting an unknown
/// id as success. Failures can be injected per call for error-path
/// tests.
#[derive(Debug, Default)]
pub struct InMemoryApi {
    todos: RwLock<Vec<Todo>>,
    failures: Mutex<VecDeque<ClientError>>,
}

impl InMemoryApi {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend seeded with existing items.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(todos),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues an error to be returned by the next call, in place of its
    /// normal behavior. Queued errors apply in order, one per call.
    pub fn fail_next(&self, error: ClientError) {
        self.failures.lock().push_back(error);
    }

    /// Returns the backend's current contents.
    pub fn todos(&self) -> Vec<Todo> {
        self.todos.read().clone()
    }

    /// Returns the number of stored items.
    pub fn len(&self) -> usize {
        self.todos.read().len()
    }

    /// Returns true if the backend holds no items.
    pub fn is_empty(&self) -> bool {
        self.todos.read().is_empty()
    }

    fn take_failure(&self) -> Option<ClientError> {
        self.failures.lock().pop_front()
    }
}

#[async_trait]
impl RestTransport for InMemoryApi {
    async fn list(&self, completed: Option<bool>) -> ClientResult<Vec<Todo>> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let todos = self.todos.read();
        Ok(match completed {
            Some(value) => todos
                .iter()
                .filter(|todo| todo.completed == value)
                .cloned()
                .collect(),
            None => todos.clone(),
        })
    }

    async fn get(&self, id: &str) -> ClientResult<Todo> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.todos
            .read()
            .iter()
            .find(|todo| todo.has_id(id))
            .cloned()
            .ok_or_else(|| ClientError::not_found(id))
    }

    async fn create(&self, draft: &TodoDraft) -> ClientResult<Todo> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let todo = Todo {
            id: Some(Uuid::new_v4().to_string()),
            title: draft.title.clone(),
            description: draft.description.clone(),
            completed: draft.completed,
            due_date: draft.due_date,
        };
        self.todos.write().push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> ClientResult<Todo> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let mut todos = self.todos.write();
        let slot = todos
            .iter_mut()
            .find(|todo| todo.has_id(id))
            .ok_or_else(|| ClientError::not_found(id))?;
        patch.apply_to(slot);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.todos.write().retain(|todo| !todo.has_id(id));
        Ok(())
    }
}
