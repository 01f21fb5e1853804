use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional profile details attached to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// A registered user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user, used when populating authors on posts
/// and comments
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub profile: Profile,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            profile: user.profile.clone(),
        }
    }
}
