use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Identity as it crosses into application state. Never carries a password.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User record kept by the local simulation. The password is plaintext.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SimulatedUser {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

/// User record kept by the live backend.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    pub password_hash: String,
}
