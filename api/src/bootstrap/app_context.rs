use std::sync::Arc;

use crate::application::ports::avatar_storage::AvatarStorage;
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::ports::email_sender::EmailSender;
use crate::application::ports::user_cache::UserCache;
use crate::application::services::tokens::JwtKeys;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    contact_repo: Arc<dyn ContactRepository>,
    user_cache: Arc<dyn UserCache>,
    avatar_storage: Arc<dyn AvatarStorage>,
    email_sender: Arc<dyn EmailSender>,
}

impl AppServices {
    pub fn new(
        contact_repo: Arc<dyn ContactRepository>,
        user_cache: Arc<dyn UserCache>,
        avatar_storage: Arc<dyn AvatarStorage>,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            contact_repo,
            user_cache,
            avatar_storage,
            email_sender,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn contact_repo(&self) -> Arc<dyn ContactRepository> {
        self.services.contact_repo.clone()
    }

    pub fn user_cache(&self) -> Arc<dyn UserCache> {
        self.services.user_cache.clone()
    }

    pub fn avatar_storage(&self) -> Arc<dyn AvatarStorage> {
        self.services.avatar_storage.clone()
    }

    pub fn email_sender(&self) -> Arc<dyn EmailSender> {
        self.services.email_sender.clone()
    }

    pub fn jwt_keys(&self) -> JwtKeys {
        JwtKeys::new(self.cfg.jwt_secret.clone(), self.cfg.jwt_expires_secs)
    }
}
