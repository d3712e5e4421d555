//! Resource records exchanged with the remote API.
//!
//! These are transferred verbatim; stores never validate or reshape them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type QuestionId = u64;
pub type AnswerId = u64;
pub type UserId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub author_id: UserId,
    #[serde(default)]
    pub author_name: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub like_user_ids: BTreeSet<UserId>,
    #[serde(default)]
    pub scrap_user_ids: BTreeSet<UserId>,
    #[serde(default)]
    pub adopted_answer_id: Option<AnswerId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub author_id: UserId,
    #[serde(default)]
    pub author_name: String,
    pub body: String,
    #[serde(default)]
    pub like_user_ids: BTreeSet<UserId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Leaderboard window for the top-question listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Period {
    #[default]
    Week,
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

/// Sort order accepted by the question listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum QuestionSort {
    #[default]
    CreatedAt,
    Like,
}

impl QuestionSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionSort::CreatedAt => "createdAt",
            QuestionSort::Like => "like",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub points: u32,
}

/// Editable fields of an existing question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEdit {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnswer {
    pub question_id: QuestionId,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptAnswer {
    #[serde(skip)]
    pub question_id: QuestionId,
    pub answer_id: AnswerId,
    pub points: u32,
    pub message: String,
}

/// Signup form. Deliberately not `Debug`: it carries a password.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Login form. Not `Debug` for the same reason as [`NewUser`].
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
