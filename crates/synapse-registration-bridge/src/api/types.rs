//! API request and response types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields posted by the registration form.
///
/// Missing fields deserialize as empty so they fail validation with a
/// readable notice instead of an extractor rejection.
#[derive(Deserialize)]
pub struct RegistrationForm {
    #[serde(rename = "Username", default)]
    pub username: String,

    #[serde(rename = "Password", default)]
    pub password: String,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
