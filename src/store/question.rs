use std::sync::Arc;

use crate::api::{
    AdoptAnswer, ApiError, NewQuestion, Question, QuestionEdit, QuestionId, QuestionSort,
    RemoteService, UserId,
};

use super::observable::{Observable, Store};
use super::status::{run_operation, OperationStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionState {
    pub keyword: String,

    pub is_question_loading: bool,
    pub question: Option<Question>,
    pub is_questions_loading: bool,
    pub questions: Vec<Question>,
    pub is_question_previews_loading: bool,
    pub question_previews: Vec<Question>,
    pub scrapped_questions: Vec<Question>,
    pub scrapped_questions_status: OperationStatus,

    /// Identifier returned by the last successful `create`.
    pub created_question_id: Option<QuestionId>,

    pub create_status: OperationStatus,
    pub modify_status: OperationStatus,
    pub delete_status: OperationStatus,
    pub scrap_status: OperationStatus,
    pub cancel_scrap_status: OperationStatus,
    pub adopt_status: OperationStatus,
}

impl QuestionState {
    fn held_question_mut(&mut self, id: QuestionId) -> Option<&mut Question> {
        self.question.as_mut().filter(|question| question.id == id)
    }

    fn forget(&mut self, id: QuestionId) {
        if self.held_question_mut(id).is_some() {
            self.question = None;
        }
        self.questions.retain(|question| question.id != id);
        self.question_previews.retain(|question| question.id != id);
        self.scrapped_questions.retain(|question| question.id != id);
    }
}

/// Questions: search, detail, per-author previews, scraps and every
/// mutating flow on a single question.
pub struct QuestionStore {
    service: Arc<dyn RemoteService>,
    observable: Observable<QuestionState>,
}

impl QuestionStore {
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self {
            service,
            observable: Observable::default(),
        }
    }

    /// Search questions matching `keyword`. A failure ends with an empty list.
    pub async fn fetch_questions(&self, sort: QuestionSort, keyword: &str) {
        self.observable.update(|state| {
            state.is_questions_loading = true;
            state.questions.clear();
        });

        let questions = self
            .service
            .fetch_questions(sort, keyword)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    keyword = %keyword,
                    error_type = e.error_type(),
                    error = %e,
                    "Failed to load questions"
                );
                Vec::new()
            });

        self.observable.update(|state| {
            state.is_questions_loading = false;
            state.questions = questions;
        });
    }

    /// Load the questions written by `user_id`.
    pub async fn fetch_question_previews(&self, user_id: UserId, sort: QuestionSort) {
        self.observable.update(|state| {
            state.is_question_previews_loading = true;
            state.question_previews.clear();
        });

        let previews = self
            .service
            .fetch_question_previews(user_id, sort)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    user_id,
                    error_type = e.error_type(),
                    error = %e,
                    "Failed to load question previews"
                );
                Vec::new()
            });

        self.observable.update(|state| {
            state.is_question_previews_loading = false;
            state.question_previews = previews;
        });
    }

    pub async fn fetch_question(&self, id: QuestionId) {
        self.observable.update(|state| {
            state.is_question_loading = true;
            state.question = None;
        });

        let question = match self.service.fetch_question(id).await {
            Ok(question) => Some(question),
            Err(e) => {
                tracing::warn!(
                    question_id = id,
                    error_type = e.error_type(),
                    error = %e,
                    "Failed to load question"
                );
                None
            }
        };

        self.observable.update(|state| {
            state.is_question_loading = false;
            state.question = question;
        });
    }

    /// Load the caller's scrapped questions. Needs a credential on the
    /// remote service; without one the status ends `Failed`.
    pub async fn fetch_scrapped_questions(&self) {
        self.observable.update_silently(|state| state.scrapped_questions.clear());

        run_operation(
            &self.observable,
            "fetch_scrapped_questions",
            |state: &mut QuestionState| &mut state.scrapped_questions_status,
            self.service.fetch_scrapped_questions(),
            |state, questions| state.scrapped_questions = questions,
        )
        .await;
    }

    /// Update the search keyword. Does not fetch.
    pub fn change_keyword(&self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        self.observable.update(|state| state.keyword = keyword);
    }

    /// Toggle the caller's like on the held question.
    ///
    /// A failed call changes nothing and is returned to the caller.
    pub async fn toggle_like(&self, id: QuestionId) -> Result<(), ApiError> {
        let like_user_ids = self.service.toggle_question_like(id).await?;

        self.observable.update(|state| {
            if let Some(question) = state.held_question_mut(id) {
                question.like_user_ids = like_user_ids;
            }
        });
        Ok(())
    }

    /// Whether the held question was written by `user_id`.
    pub fn is_my_question(&self, user_id: UserId) -> bool {
        self.observable.read(|state| {
            state
                .question
                .as_ref()
                .is_some_and(|question| question.author_id == user_id)
        })
    }

    pub async fn create(&self, question: NewQuestion) {
        let service = Arc::clone(&self.service);
        run_operation(
            &self.observable,
            "create_question",
            |state: &mut QuestionState| &mut state.create_status,
            async move { service.create_question(&question).await },
            |state, id| state.created_question_id = Some(id),
        )
        .await;
    }

    /// Edit the held question. Fails without a remote call when no
    /// question is loaded.
    pub async fn modify(&self, edit: QuestionEdit) {
        let target = self
            .observable
            .read(|state| state.question.as_ref().map(|question| question.id));
        let service = Arc::clone(&self.service);
        let applied = edit.clone();

        run_operation(
            &self.observable,
            "modify_question",
            |state: &mut QuestionState| &mut state.modify_status,
            async move {
                let id = target.ok_or("no question loaded")?;
                service
                    .modify_question(id, &edit)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok::<_, String>(id)
            },
            |state, id| {
                if let Some(question) = state.held_question_mut(id) {
                    question.title = applied.title;
                    question.body = applied.body;
                    question.tags = applied.tags;
                }
            },
        )
        .await;
    }

    pub async fn delete(&self, id: QuestionId) {
        run_operation(
            &self.observable,
            "delete_question",
            |state: &mut QuestionState| &mut state.delete_status,
            self.service.delete_question(id),
            |state, ()| state.forget(id),
        )
        .await;
    }

    /// Scrap question `id`. The held question, when it matches, joins
    /// `scrapped_questions`; `cancel_scrap` removes it again.
    pub async fn scrap(&self, id: QuestionId) {
        run_operation(
            &self.observable,
            "scrap_question",
            |state: &mut QuestionState| &mut state.scrap_status,
            self.service.scrap_question(id, true),
            |state, scrap_user_ids| {
                let Some(question) = state.held_question_mut(id) else {
                    return;
                };
                question.scrap_user_ids = scrap_user_ids;
                let question = question.clone();
                match state.scrapped_questions.iter_mut().find(|held| held.id == id) {
                    Some(held) => *held = question,
                    None => state.scrapped_questions.push(question),
                }
            },
        )
        .await;
    }

    pub async fn cancel_scrap(&self, id: QuestionId) {
        run_operation(
            &self.observable,
            "cancel_scrap_question",
            |state: &mut QuestionState| &mut state.cancel_scrap_status,
            self.service.scrap_question(id, false),
            |state, scrap_user_ids| {
                if let Some(question) = state.held_question_mut(id) {
                    question.scrap_user_ids = scrap_user_ids;
                }
                state.scrapped_questions.retain(|question| question.id != id);
            },
        )
        .await;
    }

    pub async fn adopt_answer(&self, adoption: AdoptAnswer) {
        let question_id = adoption.question_id;
        let answer_id = adoption.answer_id;
        let service = Arc::clone(&self.service);

        run_operation(
            &self.observable,
            "adopt_answer",
            |state: &mut QuestionState| &mut state.adopt_status,
            async move { service.adopt_answer(&adoption).await },
            |state, ()| {
                if let Some(question) = state.held_question_mut(question_id) {
                    question.adopted_answer_id = Some(answer_id);
                }
            },
        )
        .await;
    }

    pub fn question(&self) -> Option<Question> {
        self.observable.read(|state| state.question.clone())
    }

    pub fn questions(&self) -> Vec<Question> {
        self.observable.read(|state| state.questions.clone())
    }

    pub fn keyword(&self) -> String {
        self.observable.read(|state| state.keyword.clone())
    }

    pub fn is_create_successful(&self) -> bool {
        self.observable.read(|state| state.create_status.is_successful())
    }

    pub fn is_create_failed(&self) -> bool {
        self.observable.read(|state| state.create_status.is_failed())
    }

    pub fn is_modify_successful(&self) -> bool {
        self.observable.read(|state| state.modify_status.is_successful())
    }

    pub fn is_modify_failed(&self) -> bool {
        self.observable.read(|state| state.modify_status.is_failed())
    }

    pub fn is_delete_successful(&self) -> bool {
        self.observable.read(|state| state.delete_status.is_successful())
    }

    pub fn is_delete_failed(&self) -> bool {
        self.observable.read(|state| state.delete_status.is_failed())
    }

    pub fn is_scrap_successful(&self) -> bool {
        self.observable.read(|state| state.scrap_status.is_successful())
    }

    pub fn is_scrap_failed(&self) -> bool {
        self.observable.read(|state| state.scrap_status.is_failed())
    }

    pub fn is_cancel_scrap_successful(&self) -> bool {
        self.observable.read(|state| state.cancel_scrap_status.is_successful())
    }

    pub fn is_cancel_scrap_failed(&self) -> bool {
        self.observable.read(|state| state.cancel_scrap_status.is_failed())
    }

    pub fn is_adopt_successful(&self) -> bool {
        self.observable.read(|state| state.adopt_status.is_successful())
    }

    pub fn is_adopt_failed(&self) -> bool {
        self.observable.read(|state| state.adopt_status.is_failed())
    }

    /// Restore every field, statuses included, to its default.
    /// Subscribers are kept and not notified.
    pub fn reset(&self) {
        self.observable.update_silently(|state| *state = QuestionState::default());
    }
}

impl Store for QuestionStore {
    type State = QuestionState;

    fn observable(&self) -> &Observable<QuestionState> {
        &self.observable
    }
}
