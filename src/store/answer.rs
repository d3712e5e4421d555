use std::sync::Arc;

use crate::api::{Answer, AnswerId, ApiError, NewAnswer, QuestionId, RemoteService};

use super::observable::{Observable, Store};
use super::status::{run_operation, OperationStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerState {
    pub is_answers_loading: bool,
    pub answers: Vec<Answer>,
    pub is_answer_loading: bool,
    pub answer: Option<Answer>,
    pub write_status: OperationStatus,
}

/// Answers attached to a question, plus the answer-writing flow.
pub struct AnswerStore {
    service: Arc<dyn RemoteService>,
    observable: Observable<AnswerState>,
}

impl AnswerStore {
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self {
            service,
            observable: Observable::default(),
        }
    }

    /// Load every answer to `question_id`.
    ///
    /// A failed load ends with an empty list, indistinguishable from a
    /// question that has no answers.
    pub async fn fetch_answers(&self, question_id: QuestionId) {
        self.observable.update(|state| {
            state.is_answers_loading = true;
            state.answers.clear();
        });

        let answers = match self.service.fetch_answers(question_id).await {
            Ok(answers) => answers,
            Err(e) => {
                tracing::warn!(
                    question_id,
                    error_type = e.error_type(),
                    error = %e,
                    "Failed to load answers"
                );
                Vec::new()
            }
        };

        self.observable.update(|state| {
            state.is_answers_loading = false;
            state.answers = answers;
        });
    }

    pub async fn fetch_answer(&self, id: AnswerId) {
        self.observable.update(|state| {
            state.is_answer_loading = true;
            state.answer = None;
        });

        let answer = match self.service.fetch_answer(id).await {
            Ok(answer) => Some(answer),
            Err(e) => {
                tracing::warn!(
                    answer_id = id,
                    error_type = e.error_type(),
                    error = %e,
                    "Failed to load answer"
                );
                None
            }
        };

        self.observable.update(|state| {
            state.is_answer_loading = false;
            state.answer = answer;
        });
    }

    /// Toggle the caller's like on answer `id`.
    ///
    /// Only the matching record in `answers` is replaced, and only after
    /// the server has answered. A failed call changes nothing and is
    /// returned to the caller.
    pub async fn toggle_like(&self, id: AnswerId) -> Result<(), ApiError> {
        let like_user_ids = self.service.toggle_answer_like(id).await?;

        self.observable.update(|state| {
            if let Some(answer) = state.answers.iter_mut().find(|answer| answer.id == id) {
                answer.like_user_ids = like_user_ids;
            }
        });
        Ok(())
    }

    /// Create an answer, then load the full record and append it.
    pub async fn write(&self, answer: NewAnswer) {
        let service = Arc::clone(&self.service);
        run_operation(
            &self.observable,
            "write_answer",
            |state: &mut AnswerState| &mut state.write_status,
            async move {
                let id = service.create_answer(&answer).await?;
                service.fetch_answer(id).await
            },
            |state, created| state.answers.push(created),
        )
        .await;
    }

    pub fn is_write_successful(&self) -> bool {
        self.observable.read(|state| state.write_status.is_successful())
    }

    pub fn is_write_failed(&self) -> bool {
        self.observable.read(|state| state.write_status.is_failed())
    }

    pub fn answers(&self) -> Vec<Answer> {
        self.observable.read(|state| state.answers.clone())
    }

    pub fn answer(&self) -> Option<Answer> {
        self.observable.read(|state| state.answer.clone())
    }

    /// Restore construction defaults. Subscribers are kept and not notified.
    pub fn reset(&self) {
        self.observable.update_silently(|state| *state = AnswerState::default());
    }
}

impl Store for AnswerStore {
    type State = AnswerState;

    fn observable(&self) -> &Observable<AnswerState> {
        &self.observable
    }
}
