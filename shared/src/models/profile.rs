//! Profile Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile entity - one human account, 1:1 with the auth subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Equals the session subject identifier.
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// Create profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: String,
}
