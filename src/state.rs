use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
}
