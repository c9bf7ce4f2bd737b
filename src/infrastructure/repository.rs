use crate::domain::models::{Activity, Comment, Notification, Organization, Task};
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::{ApiGateway, HttpMethod};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

/// One remote resource collection. `COLLECTION` is the path segment under
/// the API root; ids are always server-assigned.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync {
    const COLLECTION: &'static str;
    fn id(&self) -> i64;
}

impl Resource for Task {
    const COLLECTION: &'static str = "tasks";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Resource for Organization {
    const COLLECTION: &'static str = "organizations";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Resource for Activity {
    const COLLECTION: &'static str = "activities";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Resource for Comment {
    const COLLECTION: &'static str = "comments";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Resource for Notification {
    const COLLECTION: &'static str = "notifications";
    fn id(&self) -> i64 {
        self.id
    }
}

/// Fetches and mutates one resource collection, mirroring the last known
/// server state in an order-preserving cache. A failed call leaves the
/// cache exactly as it was; update and remove check the cache before
/// touching the network. Rapid repeated mutations on the same id are not
/// sequenced, so the last response to arrive wins.
pub struct EntityRepository<R: Resource, G: ApiGateway> {
    gateway: Arc<G>,
    entries: Mutex<Vec<R>>,
}

impl<R: Resource, G: ApiGateway> EntityRepository<R, G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Replaces the whole cache with the fetched collection, preserving
    /// server order.
    pub async fn list(&self) -> Result<Vec<R>, ApiError> {
        self.fetch_into_cache(format!("{}/", R::COLLECTION)).await
    }

    /// `list` with a query string, e.g. comments scoped to one task.
    pub async fn list_filtered(&self, query: &[(&str, String)]) -> Result<Vec<R>, ApiError> {
        let mut encoded = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in query {
            encoded.append_pair(key, value);
        }
        self.fetch_into_cache(format!("{}/?{}", R::COLLECTION, encoded.finish()))
            .await
    }

    pub async fn create<D: Serialize + Sync>(&self, draft: &D) -> Result<R, ApiError> {
        let body = encode_body(draft)?;
        let payload = self
            .gateway
            .send(HttpMethod::Post, &format!("{}/", R::COLLECTION), Some(body))
            .await?;
        let created: R = decode_entity(payload)?;

        self.lock_entries()?.push(created.clone());
        Ok(created)
    }

    pub async fn update<P: Serialize + Sync>(&self, id: i64, patch: &P) -> Result<R, ApiError> {
        self.guard_cached(id)?;

        let body = encode_body(patch)?;
        let payload = self
            .gateway
            .send(HttpMethod::Patch, &Self::entity_path(id), Some(body))
            .await?;
        let updated: R = decode_entity(payload)?;

        self.absorb(updated.clone())?;
        Ok(updated)
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.guard_cached(id)?;

        self.gateway
            .send(HttpMethod::Delete, &Self::entity_path(id), None)
            .await?;

        self.lock_entries()?.retain(|entry| entry.id() != id);
        Ok(())
    }

    /// Replaces the cached entity carrying the same id, appending when the
    /// id is new. Used after server-side actions that return the updated
    /// entity.
    pub fn absorb(&self, entity: R) -> Result<(), ApiError> {
        let mut entries = self.lock_entries()?;
        match entries.iter_mut().find(|entry| entry.id() == entity.id()) {
            Some(slot) => *slot = entity,
            None => entries.push(entity),
        }
        Ok(())
    }

    pub fn find(&self, id: i64) -> Result<Option<R>, ApiError> {
        Ok(self.lock_entries()?.iter().find(|entry| entry.id() == id).cloned())
    }

    pub fn snapshot(&self) -> Result<Vec<R>, ApiError> {
        Ok(self.lock_entries()?.clone())
    }

    /// Client-side guard: mutating an id the cache has never seen is a
    /// local `NotFound`, not a round-trip to the server.
    fn guard_cached(&self, id: i64) -> Result<(), ApiError> {
        if self.lock_entries()?.iter().any(|entry| entry.id() == id) {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!(
                "no cached entry {id} in {}",
                R::COLLECTION
            )))
        }
    }

    async fn fetch_into_cache(&self, path: String) -> Result<Vec<R>, ApiError> {
        let payload = self.gateway.send(HttpMethod::Get, &path, None).await?;
        let fetched: Vec<R> = decode_entity(payload)?;

        *self.lock_entries()? = fetched.clone();
        Ok(fetched)
    }

    fn entity_path(id: i64) -> String {
        format!("{}/{id}/", R::COLLECTION)
    }

    fn lock_entries(&self) -> Result<std::sync::MutexGuard<'_, Vec<R>>, ApiError> {
        self.entries
            .lock()
            .map_err(|error| ApiError::Internal(format!("entity cache lock poisoned: {error}")))
    }
}

fn encode_body<D: Serialize>(body: &D) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|error| ApiError::Internal(format!("failed encoding request body: {error}")))
}

fn decode_entity<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|error| ApiError::Payload(format!("unexpected response shape: {error}")))
}
