//! Observable domain stores.
//!
//! Each store owns an [`Observable`] over its field set and exposes async
//! command methods. Every state transition is followed by a publish, so
//! subscribers re-read the store after each step:
//!
//! ```text
//! command ──→ Processing ──publish──→ remote call ──→ Successful | Failed ──publish
//! ```
//!
//! Concurrent commands on the same store are not serialized: whichever
//! completes last determines the final state.

mod answer;
mod observable;
mod question;
mod status;
mod top_question;
mod user;

pub use answer::{AnswerState, AnswerStore};
pub use observable::{Observable, Store, SubscriptionId};
pub use question::{QuestionState, QuestionStore};
pub use status::OperationStatus;
pub use top_question::{TopQuestionState, TopQuestionStore};
pub use user::{UserState, UserStore};
