use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A named order lifecycle label.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStatus {
    /// Unique identifier
    pub id: Uuid,
    /// Status name (unique; canonical values are pending, processing,
    /// completed, canceled)
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for registering a new status
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStatus {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

/// DTO for renaming a status
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStatus {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
}

impl OrderStatus {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateStatus) {
        if let Some(name) = update.name {
            self.name = name;
        }
        self.updated_at = Utc::now();
    }
}
