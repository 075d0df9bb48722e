use std::sync::Arc;

use crate::auth::{AuthError, JwtKeys};
use crate::config::AppConfig;
use crate::database::AccountRepository;
use crate::services::{ProfileService, UploadStore};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: AppConfig,
    profiles: ProfileService,
    uploads: UploadStore,
    jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: AppConfig, repo: Arc<dyn AccountRepository>) -> Result<Self, AuthError> {
        let jwt = JwtKeys::from_config(&config.security)?;
        let profiles = ProfileService::new(repo, config.security.bcrypt_cost);
        let uploads = UploadStore::new(config.uploads.dir.clone(), config.uploads.max_bytes);
        Ok(Self {
            inner: Arc::new(Inner { config, profiles, uploads, jwt }),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn profiles(&self) -> &ProfileService {
        &self.inner.profiles
    }

    pub fn repository(&self) -> &Arc<dyn AccountRepository> {
        self.inner.profiles.repository()
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    pub fn jwt(&self) -> &JwtKeys {
        &self.inner.jwt
    }
}
