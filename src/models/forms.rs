use serde::{Deserialize, Serialize};
use super::user::User;
use super::task::NewTask;

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    if !email.contains('@') {
        return Err("Invalid email format.".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password too short. {} characters minimum.",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_credentials(&self.email, &self.password)
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(format!(
                "Name too short. {} characters minimum.",
                MIN_NAME_LEN
            ));
        }
        validate_credentials(&self.email, &self.password)
    }
}

impl NewTask {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Task title is required.".to_string());
        }
        Ok(())
    }
}
