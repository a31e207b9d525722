//! Transport layer abstraction for the REST collection.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use todosync_model::{Todo, TodoDraft, TodoPatch};

/// A transport performs the REST verbs against the remote collection.
///
/// This trait abstracts the network layer, allowing different
/// implementations (HTTP, mock for testing, in-memory backends).
/// Implementations return already-normalized errors; the store never
/// sees a raw transport failure.
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Reads the whole collection, optionally filtered server-side by
    /// completion state.
    async fn list(&self, completed: Option<bool>) -> ClientResult<Vec<Todo>>;

    /// Reads a single item by id.
    async fn get(&self, id: &str) -> ClientResult<Todo>;

    /// Creates a new item and returns it with its server-assigned id.
    async fn create(&self, draft: &TodoDraft) -> ClientResult<Todo>;

    /// Applies a partial update and returns the merged item.
    async fn update(&self, id: &str, patch: &TodoPatch) -> ClientResult<Todo>;

    /// Deletes an item. Deleting an id the server no longer knows is
    /// not an error.
    async fn delete(&self, id: &str) -> ClientResult<()>;
}

/// A mock transport with scripted responses, for testing.
///
/// Each verb pops from its own response queue; a call with no queued
/// response fails with [`ClientError::Unknown`]. Every call, whatever
/// its outcome, increments the request counter.
#[derive(Debug, Default)]
pub struct MockTransport {
    list_responses: Mutex<VecDeque<ClientResult<Vec<Todo>>>>,
    get_responses: Mutex<VecDeque<ClientResult<Todo>>>,
    create_responses: Mutex<VecDeque<ClientResult<Todo>>>,
    update_responses: Mutex<VecDeque<ClientResult<Todo>>>,
    delete_responses: Mutex<VecDeque<ClientResult<()>>>,
    requests: AtomicUsize,
}

impl MockTransport {
    /// Creates a mock transport with empty response queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next `list` call.
    pub fn push_list(&self, response: ClientResult<Vec<Todo>>) {
        self.list_responses.lock().push_back(response);
    }

    /// Queues a response for the next `get` call.
    pub fn push_get(&self, response: ClientResult<Todo>) {
        self.get_responses.lock().push_back(response);
    }

    /// Queues a response for the next `create` call.
    pub fn push_create(&self, response: ClientResult<Todo>) {
        self.create_responses.lock().push_back(response);
    }

    /// Queues a response for the next `update` call.
    pub fn push_update(&self, response: ClientResult<Todo>) {
        self.update_responses.lock().push_back(response);
    }

    /// Queues a response for the next `delete` call.
    pub fn push_delete(&self, response: ClientResult<()>) {
        self.delete_responses.lock().push_back(response);
    }

    /// Returns how many requests have been issued so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn pop<R>(&self, queue: &Mutex<VecDeque<ClientResult<R>>>, verb: &str) -> ClientResult<R> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Unknown(format!("no mock response for {verb}"))))
    }
}

#[async_trait]
impl RestTransport for MockTransport {
    async fn list(&self, _completed: Option<bool>) -> ClientResult<Vec<Todo>> {
        self.pop(&self.list_responses, "list")
    }

    async fn get(&self, _id: &str) -> ClientResult<Todo> {
        self.pop(&self.get_responses, "get")
    }

    async fn create(&self, _draft: &TodoDraft) -> ClientResult<Todo> {
        self.pop(&self.create_responses, "create")
    }

    async fn update(&self, _id: &str, _patch: &TodoPatch) -> ClientResult<Todo> {
        self.pop(&self.update_responses, "update")
    }

    async fn delete(&self, _id: &str) -> ClientResult<()> {
        self.pop(&self.delete_responses, "delete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: &str, title: &str) -> Todo {
        Todo {
            id: Some(id.to_string()),
            title: title.to_string(),
            description: None,
            completed: false,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn scripted_responses_pop_in_order() {
        let transport = MockTransport::new();
        transport.push_get(Ok(todo("1", "First")));
        transport.push_get(Err(ClientError::not_found("2")));

        let first = transport.get("1").await.unwrap();
        assert_eq!(first.title, "First");

        let second = transport.get("2").await;
        assert!(matches!(second, Err(ClientError::NotFound { .. })));

        assert_eq!(transport.requests(), 2);
    }

    #[tokio::test]
    async fn unscripted_call_fails() {
        let transport = MockTransport::new();
        let result = transport.list(None).await;
        assert!(matches!(result, Err(ClientError::Unknown(_))));
        assert_eq!(transport.requests(), 1);
    }
}
