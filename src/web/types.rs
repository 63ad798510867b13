// src/web/types.rs
use rocket::serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct GenerateEmailRequest {
    /// Job-posting URL. Falls back to the configured example URL.
    pub url: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct EmailResponse {
    pub success: bool,
    pub role: String,
    pub general_role: String,
    pub email: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

impl ErrorResponse {
    pub fn new(error: String, error_code: &str) -> Self {
        Self {
            success: false,
            error,
            error_code: error_code.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: &'static str,
}
