//! Clients service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Client, CreateClient, UpdateClient},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.repository.clients.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Client> {
        self.repository.clients.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateClient) -> AppResult<Client> {
        let client = self.repository.clients.create(data.into_new()?).await?;
        tracing::info!(id = %client.id, "Client created");
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, data: UpdateClient) -> AppResult<Client> {
        self.repository.clients.update(id, data.into_patch()?).await
    }

    /// Delete a client (refused while it still owns equipment)
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.clients.delete(id).await? {
            return Err(AppError::NotFound(format!("Client {} not found", id)));
        }
        tracing::info!(id = %id, "Client deleted");
        Ok(())
    }
}
