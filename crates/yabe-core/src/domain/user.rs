use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an author who can sign in and publish posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub fullname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        fullname: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password: password.into(),
            fullname: fullname.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Plain string comparison against the stored password.
    pub fn has_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_password_is_exact() {
        let user = User::new("martin@hot.ee", "secret", "Martin");
        assert!(user.has_password("secret"));
        assert!(!user.has_password("Secret"));
        assert!(!user.has_password("secret "));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let user = User::new("martin@hot.ee", "secret", "Martin");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["fullname"], "Martin");
    }
}
