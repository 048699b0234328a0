use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Deliberately not `Serialize`: the hash must never leave the store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
        }
    }
}

/// Body of both signup and signin requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response to a successful signup.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

/// Response to a successful signin.
#[derive(Debug, Serialize, Deserialize)]
pub struct SigninResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_users_get_distinct_ids() {
        let a = User::new("alice1".into(), "hash".into());
        let b = User::new("alice1".into(), "hash".into());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_signup_response_has_no_password() {
        let response = SignupResponse {
            id: Uuid::new_v4(),
            username: "alice1".into(),
            token: "t".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("password").is_none());
    }
}
