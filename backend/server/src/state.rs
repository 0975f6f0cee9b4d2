use std::sync::Arc;

use axum::extract::FromRef;

use super::{config::Config, error::FirebaseError, firebase::FirebaseAdmin};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub firebase: Arc<FirebaseAdmin>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, FirebaseError> {
        let firebase = FirebaseAdmin::shared(&config).await?;

        Ok(Self {
            config: Arc::new(config),
            firebase,
        })
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<FirebaseAdmin> {
    fn from_ref(state: &AppState) -> Self {
        state.firebase.clone()
    }
}
