//! Client-side data layer for a question-and-answer service.
//!
//! Domain stores fetch and mutate questions, answers and users through a
//! [`api::RemoteService`] and notify subscribers after every state change.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod store;
