//! HTTP implementation of [`RemoteService`] on top of `reqwest`.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::models::{
    AdoptAnswer, Answer, AnswerId, Credentials, NewAnswer, NewQuestion, NewUser, Period,
    Question, QuestionEdit, QuestionId, QuestionSort, UserId,
};
use super::service::RemoteService;
use crate::config::{bearer_header, ApiConfig, SecureString};

#[derive(Deserialize)]
struct QuestionsPayload {
    questions: Vec<Question>,
}

#[derive(Deserialize)]
struct AnswersPayload {
    answers: Vec<Answer>,
}

#[derive(Deserialize)]
struct CreatedPayload {
    id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikePayload {
    like_user_ids: BTreeSet<UserId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapPayload {
    scrap_user_ids: BTreeSet<UserId>,
}

#[derive(Serialize)]
struct ScrapRequest {
    scrapped: bool,
}

#[derive(Deserialize)]
struct CountPayload {
    count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    access_token: String,
}

/// REST client for the question-and-answer API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    top_questions_size: u32,
    access_token: RwLock<Option<SecureString>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|e| ApiError::Transport {
                path: base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url,
            top_questions_size: config.top_questions_size,
            access_token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn builder(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path, query)?;
        let mut builder = self.client.request(method, url);

        let token = self.access_token.read();
        if let Some((name, value)) = bearer_header(token.as_ref()) {
            builder = builder.header(name, value);
        }

        Ok(builder)
    }

    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::debug!(path = %path, status = status.as_u16(), "API request rejected");
        Err(ApiError::from_status(path, status.as_u16(), message))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let builder = self.builder(Method::GET, path, query)?;
        let response = self.execute(builder, path).await?;
        decode(response, path).await
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.builder(method, path, &[])?.json(body);
        let response = self.execute(builder, path).await?;
        decode(response, path).await
    }

    /// Like [`ApiClient::send`] but ignores the response body.
    async fn send_discarding<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut builder = self.builder(method, path, &[])?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder, path).await?;
        Ok(())
    }
}

fn transport_error(path: &str, source: reqwest::Error) -> ApiError {
    if source.is_timeout() {
        ApiError::Timeout {
            path: path.to_string(),
        }
    } else {
        ApiError::Transport {
            path: path.to_string(),
            source,
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(path, e))?;

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl RemoteService for ApiClient {
    fn set_access_token(&self, token: Option<SecureString>) {
        tracing::info!(present = token.is_some(), "Access token updated");
        *self.access_token.write() = token;
    }

    async fn fetch_top_questions(&self, period: Period) -> Result<Vec<Question>, ApiError> {
        let size = self.top_questions_size.to_string();
        let payload: QuestionsPayload = self
            .get(
                "/questions",
                &[
                    ("sort", "like"),
                    ("status", "open"),
                    ("period", period.as_str()),
                    ("size", size.as_str()),
                ],
            )
            .await?;
        Ok(payload.questions)
    }

    async fn fetch_questions(
        &self,
        sort: QuestionSort,
        keyword: &str,
    ) -> Result<Vec<Question>, ApiError> {
        let payload: QuestionsPayload = self
            .get("/questions", &[("sort", sort.as_str()), ("keyword", keyword)])
            .await?;
        Ok(payload.questions)
    }

    async fn fetch_question_previews(
        &self,
        user_id: UserId,
        sort: QuestionSort,
    ) -> Result<Vec<Question>, ApiError> {
        let path = format!("/users/{}/questions", user_id);
        let payload: QuestionsPayload = self.get(&path, &[("sort", sort.as_str())]).await?;
        Ok(payload.questions)
    }

    async fn fetch_scrapped_questions(&self) -> Result<Vec<Question>, ApiError> {
        let payload: QuestionsPayload = self.get("/scraps", &[]).await?;
        Ok(payload.questions)
    }

    async fn fetch_question(&self, id: QuestionId) -> Result<Question, ApiError> {
        self.get(&format!("/questions/{}", id), &[]).await
    }

    async fn toggle_question_like(&self, id: QuestionId) -> Result<BTreeSet<UserId>, ApiError> {
        let path = format!("/questions/{}/like", id);
        let payload: LikePayload = self.send(Method::PATCH, &path, &serde_json::json!({})).await?;
        Ok(payload.like_user_ids)
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<QuestionId, ApiError> {
        let payload: CreatedPayload = self.send(Method::POST, "/questions", question).await?;
        Ok(payload.id)
    }

    async fn modify_question(&self, id: QuestionId, edit: &QuestionEdit) -> Result<(), ApiError> {
        let path = format!("/questions/{}", id);
        self.send_discarding(Method::PATCH, &path, Some(edit)).await
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), ApiError> {
        let path = format!("/questions/{}", id);
        self.send_discarding::<()>(Method::DELETE, &path, None).await
    }

    async fn scrap_question(
        &self,
        id: QuestionId,
        scrapped: bool,
    ) -> Result<BTreeSet<UserId>, ApiError> {
        let path = format!("/questions/{}/scrap", id);
        let payload: ScrapPayload = self
            .send(Method::PATCH, &path, &ScrapRequest { scrapped })
            .await?;
        Ok(payload.scrap_user_ids)
    }

    async fn adopt_answer(&self, adoption: &AdoptAnswer) -> Result<(), ApiError> {
        let path = format!("/questions/{}/adoption", adoption.question_id);
        self.send_discarding(Method::POST, &path, Some(adoption)).await
    }

    async fn fetch_answers(&self, question_id: QuestionId) -> Result<Vec<Answer>, ApiError> {
        let path = format!("/questions/{}/answers", question_id);
        let payload: AnswersPayload = self.get(&path, &[]).await?;
        Ok(payload.answers)
    }

    async fn fetch_answer(&self, id: AnswerId) -> Result<Answer, ApiError> {
        self.get(&format!("/answers/{}", id), &[]).await
    }

    async fn toggle_answer_like(&self, id: AnswerId) -> Result<BTreeSet<UserId>, ApiError> {
        let path = format!("/answers/{}/like", id);
        let payload: LikePayload = self.send(Method::PATCH, &path, &serde_json::json!({})).await?;
        Ok(payload.like_user_ids)
    }

    async fn create_answer(&self, answer: &NewAnswer) -> Result<AnswerId, ApiError> {
        let payload: CreatedPayload = self.send(Method::POST, "/answers", answer).await?;
        Ok(payload.id)
    }

    async fn count_user(&self, email: &str) -> Result<u64, ApiError> {
        let payload: CountPayload = self
            .get("/users", &[("countOnly", "true"), ("email", email)])
            .await?;
        Ok(payload.count)
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserId, ApiError> {
        let payload: CreatedPayload = self.send(Method::POST, "/users", user).await?;
        Ok(payload.id)
    }

    async fn post_session(&self, credentials: &Credentials) -> Result<SecureString, ApiError> {
        let payload: SessionPayload = self.send(Method::POST, "/session", credentials).await?;
        Ok(SecureString::new(payload.access_token))
    }

    async fn post_trial_session(&self) -> Result<SecureString, ApiError> {
        let payload: SessionPayload = self
            .send(Method::POST, "/session/trial", &serde_json::json!({}))
            .await?;
        Ok(SecureString::new(payload.access_token))
    }
}
