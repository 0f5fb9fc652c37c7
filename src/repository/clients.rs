//! Clients repository

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Client, ClientPatch, NewClient},
    store::ClientStore,
};

#[derive(Clone)]
pub struct ClientsRepository {
    store: Arc<dyn ClientStore>,
}

impl ClientsRepository {
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self { store }
    }

    /// List all clients ordered by name
    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.store.list().await
    }

    /// Get client by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Client> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    pub async fn create(&self, data: NewClient) -> AppResult<Client> {
        let client = Client::from_new(data);
        self.store.insert(&client).await
    }

    /// Merge a partial update and bump `updated_at`
    pub async fn update(&self, id: Uuid, patch: ClientPatch) -> AppResult<Client> {
        let mut client = self.get_by_id(id).await?;
        client.apply(patch);
        self.store
            .update(&client)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    /// Returns whether a client existed
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.store.delete(id).await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.store.count().await
    }
}
