//! In-memory `RemoteService` with canned questions, answers and users.
//!
//! Mirrors the server's validation closely enough for store tests:
//! empty bodies and oversized point offers are rejected, and protected
//! operations require a known access token.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use qna_client::api::{
    AdoptAnswer, Answer, AnswerId, ApiError, Credentials, NewAnswer, NewQuestion, NewUser,
    Period, Question, QuestionEdit, QuestionId, QuestionSort, RemoteService, UserId,
};
use qna_client::config::SecureString;

pub const ACCESS_TOKEN: &str = "ACCESS.TOKEN";
pub const TRIAL_TOKEN: &str = "TRIAL.TOKEN";
pub const TAKEN_EMAIL: &str = "tester@example.com";
pub const PASSWORD: &str = "Password1!";

/// Largest point offer the fixture accepts for an adoption.
const MAX_ADOPT_POINTS: u32 = 1000;

pub fn question(id: QuestionId, author_id: UserId, title: &str) -> Question {
    Question {
        id,
        author_id,
        author_name: format!("user{}", author_id),
        title: title.to_string(),
        body: "서버 배포 후 CORS에러가 발생합니다.".to_string(),
        tags: vec!["Web".to_string()],
        points: 20,
        like_user_ids: BTreeSet::new(),
        scrap_user_ids: BTreeSet::new(),
        adopted_answer_id: None,
        created_at: Some("2022-10-01T12:00:00".to_string()),
    }
}

pub fn answer(id: AnswerId, question_id: QuestionId, author_id: UserId, body: &str) -> Answer {
    Answer {
        id,
        question_id,
        author_id,
        author_name: format!("user{}", author_id),
        body: body.to_string(),
        like_user_ids: BTreeSet::new(),
        created_at: None,
    }
}

pub struct FixtureService {
    token: Mutex<Option<SecureString>>,
    questions: Mutex<Vec<Question>>,
    answers: Mutex<Vec<Answer>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<&'static str>>,
    answer_gates: Mutex<HashMap<QuestionId, Arc<Notify>>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl FixtureService {
    pub fn new() -> Self {
        Self {
            token: Mutex::new(None),
            questions: Mutex::new(vec![
                question(1, 1, "CORS 에러가 뜹니다. Access-Control-Allow-Origin"),
                question(2, 1, "CORS preflight 요청이 실패합니다."),
                question(3, 2, "Rust 소유권이 헷갈립니다."),
            ]),
            answers: Mutex::new(vec![
                answer(1, 1, 2, "서버에서 Access-Control-Allow-Origin 헤더를 설정하세요."),
                answer(2, 1, 3, "프록시를 사용해 보세요."),
                answer(3, 2, 2, "OPTIONS 요청을 허용하세요."),
            ]),
            next_id: AtomicU64::new(100),
            calls: Mutex::new(Vec::new()),
            answer_gates: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Names of the remote operations invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// Hold `fetch_answers(question_id)` until the returned gate is notified.
    pub fn gate_answers(&self, question_id: QuestionId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.answer_gates.lock().insert(question_id, gate.clone());
        gate
    }

    pub fn answers_for(&self, question_id: QuestionId) -> Vec<Answer> {
        self.answers
            .lock()
            .iter()
            .filter(|answer| answer.question_id == question_id)
            .cloned()
            .collect()
    }

    /// Make every later call to `operation` answer with a 500.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }

    /// Record the call, then fail it if `fail` was armed for it.
    fn enter(&self, call: &'static str) -> Result<(), ApiError> {
        self.record(call);
        if self.failing.lock().contains(call) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("{} unavailable", call),
            });
        }
        Ok(())
    }

    /// User behind the current token. Both fixture tokens belong to user 1.
    fn authorize(&self, path: &str) -> Result<UserId, ApiError> {
        match self.token.lock().as_ref().map(|token| token.expose()) {
            Some(ACCESS_TOKEN) | Some(TRIAL_TOKEN) => Ok(1),
            _ => Err(ApiError::Unauthorized {
                path: path.to_string(),
            }),
        }
    }

    fn bad_request(message: &str) -> ApiError {
        ApiError::Status {
            status: 400,
            message: message.to_string(),
        }
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("{} not found", what),
        }
    }

    fn find_question(&self, id: QuestionId) -> Result<Question, ApiError> {
        self.questions
            .lock()
            .iter()
            .find(|question| question.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("question"))
    }
}

fn toggle(set: &mut BTreeSet<UserId>, user_id: UserId) {
    if !set.remove(&user_id) {
        set.insert(user_id);
    }
}

#[async_trait]
impl RemoteService for FixtureService {
    fn set_access_token(&self, token: Option<SecureString>) {
        *self.token.lock() = token;
    }

    async fn fetch_top_questions(&self, _period: Period) -> Result<Vec<Question>, ApiError> {
        self.enter("fetch_top_questions")?;
        Ok(self.questions.lock().iter().take(2).cloned().collect())
    }

    async fn fetch_questions(
        &self,
        _sort: QuestionSort,
        keyword: &str,
    ) -> Result<Vec<Question>, ApiError> {
        self.enter("fetch_questions")?;
        Ok(self
            .questions
            .lock()
            .iter()
            .filter(|question| question.title.contains(keyword))
            .cloned()
            .collect())
    }

    async fn fetch_question_previews(
        &self,
        user_id: UserId,
        _sort: QuestionSort,
    ) -> Result<Vec<Question>, ApiError> {
        self.enter("fetch_question_previews")?;
        Ok(self
            .questions
            .lock()
            .iter()
            .filter(|question| question.author_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_scrapped_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.record("fetch_scrapped_questions");
        self.authorize("/scraps")?;
        Ok(self.questions.lock().iter().take(2).cloned().collect())
    }

    async fn fetch_question(&self, id: QuestionId) -> Result<Question, ApiError> {
        self.enter("fetch_question")?;
        self.find_question(id)
    }

    async fn toggle_question_like(&self, id: QuestionId) -> Result<BTreeSet<UserId>, ApiError> {
        self.record("toggle_question_like");
        let user_id = self.authorize("/questions/like")?;
        let mut questions = self.questions.lock();
        let question = questions
            .iter_mut()
            .find(|question| question.id == id)
            .ok_or_else(|| Self::not_found("question"))?;
        toggle(&mut question.like_user_ids, user_id);
        Ok(question.like_user_ids.clone())
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<QuestionId, ApiError> {
        self.record("create_question");
        if question.title.is_empty() || question.body.is_empty() {
            return Err(Self::bad_request("title and body are required"));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn modify_question(&self, id: QuestionId, edit: &QuestionEdit) -> Result<(), ApiError> {
        self.record("modify_question");
        if edit.title.is_empty() || edit.body.is_empty() {
            return Err(Self::bad_request("title and body are required"));
        }
        self.find_question(id).map(|_| ())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), ApiError> {
        self.record("delete_question");
        self.authorize("/questions")?;
        self.find_question(id).map(|_| ())
    }

    async fn scrap_question(
        &self,
        id: QuestionId,
        scrapped: bool,
    ) -> Result<BTreeSet<UserId>, ApiError> {
        self.record(if scrapped { "scrap_question" } else { "cancel_scrap_question" });
        let user_id = self.authorize("/questions/scrap")?;
        let mut questions = self.questions.lock();
        let question = questions
            .iter_mut()
            .find(|question| question.id == id)
            .ok_or_else(|| Self::not_found("question"))?;
        if scrapped {
            question.scrap_user_ids.insert(user_id);
        } else {
            question.scrap_user_ids.remove(&user_id);
        }
        Ok(question.scrap_user_ids.clone())
    }

    async fn adopt_answer(&self, adoption: &AdoptAnswer) -> Result<(), ApiError> {
        self.record("adopt_answer");
        if adoption.points > MAX_ADOPT_POINTS {
            return Err(Self::bad_request("not enough points"));
        }
        self.find_question(adoption.question_id).map(|_| ())
    }

    async fn fetch_answers(&self, question_id: QuestionId) -> Result<Vec<Answer>, ApiError> {
        self.enter("fetch_answers")?;
        let gate = self.answer_gates.lock().get(&question_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(self.answers_for(question_id))
    }

    async fn fetch_answer(&self, id: AnswerId) -> Result<Answer, ApiError> {
        self.enter("fetch_answer")?;
        self.answers
            .lock()
            .iter()
            .find(|answer| answer.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("answer"))
    }

    async fn toggle_answer_like(&self, id: AnswerId) -> Result<BTreeSet<UserId>, ApiError> {
        self.record("toggle_answer_like");
        let user_id = self.authorize("/answers/like")?;
        let mut answers = self.answers.lock();
        let answer = answers
            .iter_mut()
            .find(|answer| answer.id == id)
            .ok_or_else(|| Self::not_found("answer"))?;
        toggle(&mut answer.like_user_ids, user_id);
        Ok(answer.like_user_ids.clone())
    }

    async fn create_answer(&self, answer: &NewAnswer) -> Result<AnswerId, ApiError> {
        self.record("create_answer");
        let user_id = self.authorize("/answers")?;
        if answer.body.is_empty() {
            return Err(Self::bad_request("body is required"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .push(self::answer(id, answer.question_id, user_id, &answer.body));
        Ok(id)
    }

    async fn count_user(&self, email: &str) -> Result<u64, ApiError> {
        self.record("count_user");
        Ok(u64::from(email == TAKEN_EMAIL))
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserId, ApiError> {
        self.record("create_user");
        if user.password.len() < 8 {
            return Err(Self::bad_request("password is too short"));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn post_session(&self, credentials: &Credentials) -> Result<SecureString, ApiError> {
        self.record("post_session");
        if credentials.email == TAKEN_EMAIL && credentials.password == PASSWORD {
            Ok(SecureString::new(ACCESS_TOKEN))
        } else {
            Err(ApiError::Unauthorized {
                path: "/session".to_string(),
            })
        }
    }

    async fn post_trial_session(&self) -> Result<SecureString, ApiError> {
        self.record("post_trial_session");
        Ok(SecureString::new(TRIAL_TOKEN))
    }
}
