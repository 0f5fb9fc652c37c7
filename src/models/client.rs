//! Client model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{optional_text, patch_text, required_text};
use crate::error::{AppError, AppResult};

/// Client record (owner of equipment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn from_new(data: NewClient) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

/// Create client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub description: Option<String>,
}

impl CreateClient {
    pub fn into_new(self) -> AppResult<NewClient> {
        let mut errors = Vec::new();
        let name = required_text("name", self.name, &mut errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(NewClient {
            name,
            description: optional_text(self.description),
        })
    }
}

/// Update client request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: Option<String>,
    /// Empty string clears the description
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl UpdateClient {
    pub fn into_patch(self) -> AppResult<ClientPatch> {
        let mut errors = Vec::new();
        let name = self.name.map(|n| required_text("name", n, &mut errors));
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(ClientPatch {
            name,
            description: patch_text(self.description),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_trims_name() {
        let new = CreateClient {
            name: "  Padaria Central ".into(),
            description: Some(" ".into()),
        }
        .into_new()
        .unwrap();
        assert_eq!(new.name, "Padaria Central");
        assert_eq!(new.description, None);
    }

    #[test]
    fn test_update_client_rejects_blank_name() {
        let update = UpdateClient {
            name: Some("   ".into()),
            description: None,
        };
        assert!(matches!(update.into_patch(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_apply_patch() {
        let mut client = Client::from_new(NewClient {
            name: "Acme".into(),
            description: Some("old".into()),
        });
        let patch = UpdateClient {
            name: None,
            description: Some(String::new()),
        }
        .into_patch()
        .unwrap();
        client.apply(patch);
        assert_eq!(client.name, "Acme");
        assert_eq!(client.description, None);
    }
}
