use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::RegistrationStore;
use crate::utils::jwt::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RegistrationStore>,
    pub tokens: TokenService,
    pub config: AppConfig,
}
