use std::sync::Arc;

use crate::api::{ApiError, Period, Question, RemoteService};

use super::observable::{Observable, Store};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopQuestionState {
    pub is_questions_loaded: bool,
    pub questions: Vec<Question>,
}

/// Read-only leaderboard of the most-liked questions.
pub struct TopQuestionStore {
    service: Arc<dyn RemoteService>,
    observable: Observable<TopQuestionState>,
}

impl TopQuestionStore {
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self {
            service,
            observable: Observable::default(),
        }
    }

    /// Load the leaderboard for `period`, keeping server order.
    ///
    /// There is no failure state here: the error is handed back to the
    /// caller and the store stays in its not-loaded state.
    pub async fn fetch_questions(&self, period: Period) -> Result<(), ApiError> {
        self.observable.update(|state| state.is_questions_loaded = false);

        let questions = self.service.fetch_top_questions(period).await?;
        tracing::debug!(period = period.as_str(), count = questions.len(), "Top questions loaded");

        self.observable.update(|state| {
            state.questions = questions;
            state.is_questions_loaded = true;
        });
        Ok(())
    }

    pub fn is_questions_loaded(&self) -> bool {
        self.observable.read(|state| state.is_questions_loaded)
    }

    pub fn questions(&self) -> Vec<Question> {
        self.observable.read(|state| state.questions.clone())
    }
}

impl Store for TopQuestionStore {
    type State = TopQuestionState;

    fn observable(&self) -> &Observable<TopQuestionState> {
        &self.observable
    }
}
