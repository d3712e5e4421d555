//! The remote service seam the stores are written against.

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::error::ApiError;
use super::models::{
    AdoptAnswer, Answer, AnswerId, Credentials, NewAnswer, NewQuestion, NewUser, Period,
    Question, QuestionEdit, QuestionId, QuestionSort, UserId,
};
use crate::config::SecureString;

/// One async operation per remote resource action.
///
/// Implementations hold a mutable bearer credential: once set through
/// [`RemoteService::set_access_token`], every later call carries it.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Replace the bearer credential. `None` clears it.
    fn set_access_token(&self, token: Option<SecureString>);

    /// Most-liked open questions within `period`, in server order.
    async fn fetch_top_questions(&self, period: Period) -> Result<Vec<Question>, ApiError>;

    async fn fetch_questions(
        &self,
        sort: QuestionSort,
        keyword: &str,
    ) -> Result<Vec<Question>, ApiError>;

    /// Questions written by `user_id`.
    async fn fetch_question_previews(
        &self,
        user_id: UserId,
        sort: QuestionSort,
    ) -> Result<Vec<Question>, ApiError>;

    /// Questions scrapped by the credential's owner. Requires a credential.
    async fn fetch_scrapped_questions(&self) -> Result<Vec<Question>, ApiError>;

    async fn fetch_question(&self, id: QuestionId) -> Result<Question, ApiError>;

    /// Toggle the caller's like and return the authoritative liking-user set.
    async fn toggle_question_like(&self, id: QuestionId) -> Result<BTreeSet<UserId>, ApiError>;

    /// Returns the identifier of the created question.
    async fn create_question(&self, question: &NewQuestion) -> Result<QuestionId, ApiError>;

    async fn modify_question(&self, id: QuestionId, edit: &QuestionEdit) -> Result<(), ApiError>;

    async fn delete_question(&self, id: QuestionId) -> Result<(), ApiError>;

    /// Scrap (`true`) or un-scrap (`false`) a question; returns the
    /// authoritative scrapping-user set.
    async fn scrap_question(
        &self,
        id: QuestionId,
        scrapped: bool,
    ) -> Result<BTreeSet<UserId>, ApiError>;

    async fn adopt_answer(&self, adoption: &AdoptAnswer) -> Result<(), ApiError>;

    async fn fetch_answers(&self, question_id: QuestionId) -> Result<Vec<Answer>, ApiError>;

    async fn fetch_answer(&self, id: AnswerId) -> Result<Answer, ApiError>;

    async fn toggle_answer_like(&self, id: AnswerId) -> Result<BTreeSet<UserId>, ApiError>;

    /// Returns the identifier of the created answer.
    async fn create_answer(&self, answer: &NewAnswer) -> Result<AnswerId, ApiError>;

    /// Number of accounts registered with `email`.
    async fn count_user(&self, email: &str) -> Result<u64, ApiError>;

    async fn create_user(&self, user: &NewUser) -> Result<UserId, ApiError>;

    /// Exchange credentials for an access token.
    async fn post_session(&self, credentials: &Credentials) -> Result<SecureString, ApiError>;

    /// Access token for the shared trial account.
    async fn post_trial_session(&self) -> Result<SecureString, ApiError>;
}
