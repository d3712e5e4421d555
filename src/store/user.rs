use std::sync::Arc;

use crate::api::{ApiError, Credentials, NewUser, RemoteService, UserId};
use crate::config::SecureString;

use super::observable::{Observable, Store};
use super::status::{run_operation, OperationStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub signup_status: OperationStatus,
    /// Set when signup was refused because the email is already registered.
    pub is_email_duplicated: bool,
    pub signed_up_user_id: Option<UserId>,
    pub login_status: OperationStatus,
    pub access_token: Option<SecureString>,
}

/// Why a signup attempt did not create an account.
#[derive(Debug, thiserror::Error)]
enum SignupError {
    #[error("email is already registered")]
    EmailTaken,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Account creation and session flows.
///
/// The store keeps the token it obtained but never installs it on the
/// remote service; the owner of the service does that.
pub struct UserStore {
    service: Arc<dyn RemoteService>,
    observable: Observable<UserState>,
}

impl UserStore {
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self {
            service,
            observable: Observable::default(),
        }
    }

    /// Register a new account unless the email is already taken.
    ///
    /// A refusal for a duplicate email also sets `is_email_duplicated`.
    pub async fn signup(&self, user: NewUser) {
        self.observable.update(|state| {
            state.signup_status = OperationStatus::Processing;
            state.is_email_duplicated = false;
        });

        let result: Result<UserId, SignupError> = async {
            if self.service.count_user(&user.email).await? > 0 {
                return Err(SignupError::EmailTaken);
            }
            Ok(self.service.create_user(&user).await?)
        }
        .await;

        match result {
            Ok(id) => self.observable.update(|state| {
                state.signed_up_user_id = Some(id);
                state.signup_status = OperationStatus::Successful;
            }),
            Err(e) => {
                tracing::warn!(operation = "signup", error = %e, "Operation failed");
                self.observable.update(|state| {
                    state.is_email_duplicated = matches!(e, SignupError::EmailTaken);
                    state.signup_status = OperationStatus::Failed;
                });
            }
        }
    }

    /// Exchange credentials for an access token.
    pub async fn login(&self, credentials: Credentials) -> Option<SecureString> {
        let service = Arc::clone(&self.service);
        self.start_session(
            "login",
            async move { service.post_session(&credentials).await },
        )
        .await
    }

    /// Sign in to the shared trial account.
    pub async fn trial_login(&self) -> Option<SecureString> {
        let service = Arc::clone(&self.service);
        self.start_session("trial_login", async move { service.post_trial_session().await })
            .await
    }

    async fn start_session(
        &self,
        operation: &'static str,
        call: impl std::future::Future<Output = Result<SecureString, ApiError>>,
    ) -> Option<SecureString> {
        let succeeded = run_operation(
            &self.observable,
            operation,
            |state: &mut UserState| &mut state.login_status,
            call,
            |state, token| state.access_token = Some(token),
        )
        .await;

        if !succeeded {
            return None;
        }
        self.observable.read(|state| state.access_token.clone())
    }

    /// Forget the held token and login status.
    pub fn logout(&self) {
        self.observable.update(|state| {
            state.access_token = None;
            state.login_status = OperationStatus::Idle;
        });
    }

    pub fn is_signup_successful(&self) -> bool {
        self.observable.read(|state| state.signup_status.is_successful())
    }

    pub fn is_signup_failed(&self) -> bool {
        self.observable.read(|state| state.signup_status.is_failed())
    }

    pub fn is_login_successful(&self) -> bool {
        self.observable.read(|state| state.login_status.is_successful())
    }

    pub fn is_login_failed(&self) -> bool {
        self.observable.read(|state| state.login_status.is_failed())
    }

    /// Restore construction defaults. Subscribers are kept and not notified.
    pub fn reset(&self) {
        self.observable.update_silently(|state| *state = UserState::default());
    }
}

impl Store for UserStore {
    type State = UserState;

    fn observable(&self) -> &Observable<UserState> {
        &self.observable
    }
}
