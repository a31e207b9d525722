//! The resource cache store.

use crate::config::StoreConfig;
use crate::error::{ClientError, ClientResult};
use crate::feed::Feed;
use crate::transport::RestTransport;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use todosync_model::{validate_draft, validate_patch, Todo, TodoDraft, TodoPatch};
use tracing::{debug, warn};

/// Single point of truth for the client-visible state of one remote
/// todo collection.
///
/// The store owns the snapshot (the last known server state) and a busy
/// flag, and republishes the snapshot after every successful mutation
/// without a redundant refetch. A failed operation leaves the snapshot
/// untouched and surfaces a normalized [`ClientError`].
///
/// Consumers receive cloned snapshots, never a shared mutable view, and
/// all subscribers observe the same sequence of values. Snapshot
/// updates are applied in response arrival order; operations are not
/// serialized per id, so two overlapping mutations may settle out of
/// issue order, and the busy flag may drop to false while another
/// operation is still in flight. Construct one store per collection and
/// inject it into every consumer; there is no ambient singleton.
pub struct TodoStore<T: RestTransport> {
    config: StoreConfig,
    transport: Arc<T>,
    snapshot: RwLock<Vec<Todo>>,
    busy: AtomicBool,
    snapshot_feed: Feed<Vec<Todo>>,
    busy_feed: Feed<bool>,
}

/// Holds the busy flag for the duration of one operation.
///
/// The flag goes up synchronously when the request is issued and comes
/// down when that operation's response is processed, on success and
/// failure alike.
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
    feed: &'a Feed<bool>,
}

impl<'a> BusyGuard<'a> {
    fn new<T: RestTransport>(store: &'a TodoStore<T>) -> Self {
        store.busy.store(true, Ordering::SeqCst);
        store.busy_feed.publish(true);
        Self {
            busy: &store.busy,
            feed: &store.busy_feed,
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
        self.feed.publish(false);
    }
}

impl<T: RestTransport> TodoStore<T> {
    /// Creates a store over the given transport. The snapshot starts
    /// empty; call [`fetch_all`](Self::fetch_all) to populate it.
    pub fn new(config: StoreConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            snapshot: RwLock::new(Vec::new()),
            busy: AtomicBool::new(false),
            snapshot_feed: Feed::new(),
            busy_feed: Feed::new(),
        }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> Vec<Todo> {
        self.snapshot.read().clone()
    }

    /// Returns true while an operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Subscribes to snapshot updates.
    ///
    /// Delivery is synchronous at publish time; dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> Receiver<Vec<Todo>> {
        self.snapshot_feed.subscribe()
    }

    /// Subscribes to busy-flag changes.
    pub fn subscribe_busy(&self) -> Receiver<bool> {
        self.busy_feed.subscribe()
    }

    fn publish_snapshot(&self) {
        self.snapshot_feed.publish(self.snapshot());
    }

    /// Replaces the whole snapshot with a fresh collection read and
    /// publishes it.
    ///
    /// On failure the previous snapshot stays published unchanged and
    /// the error is returned; there is no automatic retry.
    pub async fn fetch_all(&self) -> ClientResult<Vec<Todo>> {
        let _busy = BusyGuard::new(self);

        let todos = match self.transport.list(None).await {
            Ok(todos) => todos,
            Err(error) => {
                warn!(%error, "fetch_all failed");
                return Err(error);
            }
        };

        *self.snapshot.write() = todos.clone();
        self.publish_snapshot();
        debug!(count = todos.len(), "collection fetched");
        Ok(todos)
    }

    /// Reads the collection filtered server-side by completion state.
    ///
    /// Read-through: the result goes to the caller and the snapshot is
    /// left alone, since a filtered response must not drop unfiltered
    /// items from the cache.
    pub async fn fetch_filtered(&self, completed: bool) -> ClientResult<Vec<Todo>> {
        let _busy = BusyGuard::new(self);

        match self.transport.list(Some(completed)).await {
            Ok(todos) => Ok(todos),
            Err(error) => {
                warn!(%error, completed, "fetch_filtered failed");
                Err(error)
            }
        }
    }

    /// Reads a single item by id without touching the snapshot.
    ///
    /// Fails with [`ClientError::NotFound`] when the server reports no
    /// such id.
    pub async fn fetch_one(&self, id: &str) -> ClientResult<Todo> {
        let _busy = BusyGuard::new(self);

        match self.transport.get(id).await {
            Ok(todo) => Ok(todo),
            Err(error) => {
                warn!(%error, id, "fetch_one failed");
                Err(error)
            }
        }
    }

    /// Creates a new item: validate, POST, append the server-returned
    /// item (now carrying its id) to the snapshot, publish.
    ///
    /// A draft that fails validation is rejected before the transport
    /// is touched; the busy flag does not move for it.
    pub async fn create(&self, draft: &TodoDraft) -> ClientResult<Todo> {
        validate_draft(draft, self.config.validation)?;

        let _busy = BusyGuard::new(self);

        let created = match self.transport.create(draft).await {
            Ok(created) => created,
            Err(error) => {
                warn!(%error, "create failed");
                return Err(error);
            }
        };

        self.snapshot.write().push(created.clone());
        self.publish_snapshot();
        debug!(id = ?created.id, "todo created");
        Ok(created)
    }

    /// Applies a partial update: PATCH with only the supplied fields,
    /// then replace the matching snapshot element in place (position
    /// preserved) and publish.
    ///
    /// If no element with that id exists locally, the returned item is
    /// appended instead, healing a cache that missed the create.
    pub async fn update(&self, id: &str, patch: &TodoPatch) -> ClientResult<Todo> {
        validate_patch(patch)?;

        let _busy = BusyGuard::new(self);

        let updated = match self.transport.update(id, patch).await {
            Ok(updated) => updated,
            Err(error) => {
                warn!(%error, id, "update failed");
                return Err(error);
            }
        };

        {
            let mut snapshot = self.snapshot.write();
            match snapshot.iter_mut().find(|todo| todo.has_id(id)) {
                Some(slot) => *slot = updated.clone(),
                None => snapshot.push(updated.clone()),
            }
        }
        self.publish_snapshot();
        debug!(id, "todo updated");
        Ok(updated)
    }

    /// Deletes an item and removes it from the snapshot.
    ///
    /// Idempotent: an id absent from the snapshot (or already gone on
    /// the server) is not an error, and the snapshot is republished
    /// only when something was actually removed.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let _busy = BusyGuard::new(self);

        if let Err(error) = self.transport.delete(id).await {
            warn!(%error, id, "delete failed");
            return Err(error);
        }

        let removed = {
            let mut snapshot = self.snapshot.write();
            let before = snapshot.len();
            snapshot.retain(|todo| !todo.has_id(id));
            snapshot.len() != before
        };
        if removed {
            self.publish_snapshot();
        }
        debug!(id, removed, "todo deleted");
        Ok(())
    }

    /// Flips an item's completion state optimistically, then persists
    /// it with a single-field patch.
    ///
    /// The flip is published immediately. If the persist fails, the
    /// flip is reverted and the pre-toggle snapshot republished, so the
    /// feed never settles on state the server did not confirm.
    pub async fn toggle_complete(&self, todo: &Todo) -> ClientResult<Todo> {
        let id = todo
            .id
            .clone()
            .ok_or_else(|| ClientError::Unknown("cannot toggle a todo without an id".into()))?;
        let target = !todo.completed;

        self.set_completed(&id, target);
        self.publish_snapshot();

        match self.update(&id, &TodoPatch::new().with_completed(target)).await {
            Ok(updated) => Ok(updated),
            Err(error) => {
                self.set_completed(&id, todo.completed);
                self.publish_snapshot();
                warn!(%error, id, "toggle rolled back");
                Err(error)
            }
        }
    }

    fn set_completed(&self, id: &str, completed: bool) {
        let mut snapshot = self.snapshot.write();
        if let Some(slot) = snapshot.iter_mut().find(|todo| todo.has_id(id)) {
            slot.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn todo(id: &str, title: &str) -> Todo {
        Todo {
            id: Some(id.to_string()),
            title: title.to_string(),
            description: None,
            completed: false,
            due_date: None,
        }
    }

    fn store() -> TodoStore<MockTransport> {
        TodoStore::new(
            StoreConfig::new("https://api.example.com/todos"),
            MockTransport::new(),
        )
    }

    #[tokio::test]
    async fn fetch_all_replaces_snapshot() {
        let store = store();
        store
            .transport()
            .push_list(Ok(vec![todo("1", "First"), todo("2", "Second")]));

        let fetched = store.fetch_all().await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(store.snapshot(), fetched);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn fetch_all_failure_keeps_previous_snapshot() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "First")]));
        store.fetch_all().await.unwrap();

        store
            .transport()
            .push_list(Err(ClientError::network("connection refused")));
        let result = store.fetch_all().await;

        assert!(matches!(result, Err(ClientError::Network(_))));
        assert_eq!(store.snapshot(), vec![todo("1", "First")]);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn fetch_one_does_not_touch_snapshot() {
        let store = store();
        store.transport().push_get(Ok(todo("9", "Detail")));

        let item = store.fetch_one("9").await.unwrap();
        assert_eq!(item.title, "Detail");
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn fetch_one_missing_surfaces_not_found() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "First")]));
        store.fetch_all().await.unwrap();

        store
            .transport()
            .push_get(Err(ClientError::not_found("missing")));
        let result = store.fetch_one("missing").await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(store.snapshot(), vec![todo("1", "First")]);
    }

    #[tokio::test]
    async fn fetch_filtered_is_read_through() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "First")]));
        store.fetch_all().await.unwrap();

        let mut done = todo("2", "Done thing");
        done.completed = true;
        store.transport().push_list(Ok(vec![done]));

        let filtered = store.fetch_filtered(true).await.unwrap();
        assert_eq!(filtered.len(), 1);
        // The full snapshot must not shrink to the filtered view.
        assert_eq!(store.snapshot(), vec![todo("1", "First")]);
    }

    #[tokio::test]
    async fn create_appends_server_item() {
        let store = store();
        store.transport().push_create(Ok(todo("new-id", "Buy milk")));

        let created = store.create(&TodoDraft::new("Buy milk")).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("new-id"));
        assert_eq!(store.snapshot(), vec![created]);
    }

    #[tokio::test]
    async fn create_empty_title_makes_no_network_call() {
        let store = store();

        let result = store.create(&TodoDraft::new("")).await;

        assert!(result.unwrap_err().is_validation());
        assert_eq!(store.transport().requests(), 0);
        assert!(store.snapshot().is_empty());
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn create_failure_leaves_snapshot_untouched() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "First")]));
        store.fetch_all().await.unwrap();

        store
            .transport()
            .push_create(Err(ClientError::server(500, "boom")));
        let result = store.create(&TodoDraft::new("Buy milk")).await;

        assert!(result.is_err());
        assert_eq!(store.snapshot(), vec![todo("1", "First")]);
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let store = store();
        store
            .transport()
            .push_list(Ok(vec![todo("1", "A"), todo("2", "B")]));
        store.fetch_all().await.unwrap();

        let mut updated = todo("1", "A");
        updated.completed = true;
        store.transport().push_update(Ok(updated.clone()));

        let patch = TodoPatch::new().with_completed(true);
        let returned = store.update("1", &patch).await.unwrap();
        assert_eq!(returned, updated);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        // Position preserved.
        assert_eq!(snapshot[0], updated);
        assert_eq!(snapshot[1], todo("2", "B"));
    }

    #[tokio::test]
    async fn update_unknown_id_appends_self_healing() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "A")]));
        store.fetch_all().await.unwrap();

        store.transport().push_update(Ok(todo("ghost", "Adopted")));
        store
            .update("ghost", &TodoPatch::new().with_title("Adopted"))
            .await
            .unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].id.as_deref(), Some("ghost"));
    }

    #[tokio::test]
    async fn update_failure_leaves_snapshot_untouched() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "A")]));
        store.fetch_all().await.unwrap();

        store
            .transport()
            .push_update(Err(ClientError::network("timeout")));
        let result = store
            .update("1", &TodoPatch::new().with_completed(true))
            .await;

        assert!(result.is_err());
        assert_eq!(store.snapshot(), vec![todo("1", "A")]);
    }

    #[tokio::test]
    async fn delete_removes_matching_element() {
        let store = store();
        store
            .transport()
            .push_list(Ok(vec![todo("1", "A"), todo("2", "B")]));
        store.fetch_all().await.unwrap();

        store.transport().push_delete(Ok(()));
        store.delete("1").await.unwrap();

        assert_eq!(store.snapshot(), vec![todo("2", "B")]);
    }

    #[tokio::test]
    async fn delete_absent_id_is_a_quiet_no_op() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "A")]));
        store.fetch_all().await.unwrap();

        let rx = store.subscribe();
        store.transport().push_delete(Ok(()));
        store.delete("nope").await.unwrap();

        assert_eq!(store.snapshot(), vec![todo("1", "A")]);
        // Nothing changed, so nothing was published.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn toggle_persists_single_field() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "A")]));
        store.fetch_all().await.unwrap();

        let mut flipped = todo("1", "A");
        flipped.completed = true;
        store.transport().push_update(Ok(flipped.clone()));

        let item = store.snapshot()[0].clone();
        let returned = store.toggle_complete(&item).await.unwrap();
        assert!(returned.completed);
        assert_eq!(store.snapshot(), vec![flipped]);
    }

    #[tokio::test]
    async fn toggle_failure_reverts_the_flip() {
        let store = store();
        store.transport().push_list(Ok(vec![todo("1", "A")]));
        store.fetch_all().await.unwrap();

        let rx = store.subscribe();
        store
            .transport()
            .push_update(Err(ClientError::server(500, "boom")));

        let item = store.snapshot()[0].clone();
        let result = store.toggle_complete(&item).await;

        assert!(result.is_err());
        assert_eq!(store.snapshot(), vec![todo("1", "A")]);

        // Subscribers saw the optimistic flip, then the rollback.
        let published: Vec<Vec<Todo>> = rx.try_iter().collect();
        assert_eq!(published.len(), 2);
        assert!(published[0][0].completed);
        assert!(!published[1][0].completed);
    }

    #[tokio::test]
    async fn toggle_without_id_fails_fast() {
        let store = store();
        let unsaved = Todo {
            id: None,
            ..todo("x", "Draft")
        };

        let result = store.toggle_complete(&unsaved).await;
        assert!(matches!(result, Err(ClientError::Unknown(_))));
        assert_eq!(store.transport().requests(), 0);
    }

    #[tokio::test]
    async fn subscribers_see_identical_sequences() {
        let store = store();
        let rx1 = store.subscribe();
        let rx2 = store.subscribe();

        store.transport().push_list(Ok(vec![todo("1", "A")]));
        store.fetch_all().await.unwrap();

        store.transport().push_create(Ok(todo("2", "B")));
        store.create(&TodoDraft::new("New entry")).await.unwrap();

        let seen1: Vec<Vec<Todo>> = rx1.try_iter().collect();
        let seen2: Vec<Vec<Todo>> = rx2.try_iter().collect();
        assert_eq!(seen1, seen2);
        assert_eq!(seen1.len(), 2);
        assert_eq!(seen1[1].len(), 2);
    }

    #[tokio::test]
    async fn busy_flag_goes_up_and_down() {
        let store = store();
        let rx = store.subscribe_busy();

        store.transport().push_list(Ok(vec![]));
        store.fetch_all().await.unwrap();

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![true, false]);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn busy_flag_resets_on_failure() {
        let store = store();
        store
            .transport()
            .push_list(Err(ClientError::network("down")));

        let _ = store.fetch_all().await;
        assert!(!store.is_busy());
    }
}
