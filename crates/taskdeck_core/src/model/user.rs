//! User account model.

use serde::Serialize;

/// Registered account. `password_hash` is a salted PHC string and is never
/// serialized into response shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Payload for account creation. The plain password is hashed before the
/// row is written; it never reaches the repository layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::User;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_string(&user).expect("serialization should succeed");
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("ada@example.com"));
    }
}
