//! Composition root: one instance of every store around a shared service.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, Credentials, RemoteService};
use crate::config::{Config, SecureString};
use crate::store::{AnswerStore, QuestionStore, TopQuestionStore, UserStore};

/// Owns the remote service and the stores built on it.
///
/// Tests construct their own `App` around a fake service; nothing here is
/// process-global.
pub struct App {
    service: Arc<dyn RemoteService>,
    pub top_questions: TopQuestionStore,
    pub questions: QuestionStore,
    pub answers: AnswerStore,
    pub users: UserStore,
}

impl App {
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self {
            top_questions: TopQuestionStore::new(Arc::clone(&service)),
            questions: QuestionStore::new(Arc::clone(&service)),
            answers: AnswerStore::new(Arc::clone(&service)),
            users: UserStore::new(Arc::clone(&service)),
            service,
        }
    }

    /// Build an `App` talking HTTP to the configured API.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Install (or clear) the bearer credential used by every later call.
    pub fn set_access_token(&self, token: Option<SecureString>) {
        self.service.set_access_token(token);
    }

    /// Log in and, on success, install the token on the service.
    pub async fn login(&self, credentials: Credentials) -> bool {
        let token = self.users.login(credentials).await;
        self.install(token)
    }

    /// Log in to the trial account and install its token.
    pub async fn trial_login(&self) -> bool {
        let token = self.users.trial_login().await;
        self.install(token)
    }

    pub fn logout(&self) {
        self.users.logout();
        self.service.set_access_token(None);
    }

    fn install(&self, token: Option<SecureString>) -> bool {
        match token {
            Some(token) => {
                self.service.set_access_token(Some(token));
                true
            }
            None => false,
        }
    }
}
