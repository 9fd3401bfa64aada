use serde::{Deserialize, Serialize};

use crate::api::{Anonymous, ApiClient, ApiError};
use crate::auth::session::UserProfile;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Exchange credentials for a token and profile snapshot. The profile's role
/// is parsed here, once.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
    let body = client
        .with_session(&Anonymous)
        .post_json("auth/login", credentials)
        .await?;
    Ok(serde_json::from_value(body)?)
}
