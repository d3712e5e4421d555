//! Remote API access.
//!
//! [`RemoteService`] is the seam stores depend on; [`ApiClient`] is the
//! HTTP implementation used by the binary.

mod client;
mod error;
mod models;
mod service;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{
    AdoptAnswer, Answer, AnswerId, Credentials, NewAnswer, NewQuestion, NewUser, Period,
    Question, QuestionEdit, QuestionId, QuestionSort, UserId,
};
pub use service::RemoteService;
