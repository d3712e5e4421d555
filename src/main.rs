use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use qna_client::api::{NewAnswer, Period, QuestionSort};
use qna_client::app::App;
use qna_client::config::{Config, SecureString};
use qna_client::logging::init_tracing;
use qna_client::store::Store;

#[derive(Parser, Debug)]
#[command(name = "qna", about = "Command-line client for the Q&A service")]
struct Cli {
    /// Path to the config file (defaults to the user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL from the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token for authenticated operations.
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Most-liked open questions.
    Top {
        #[arg(long, value_enum, default_value_t = Period::Week)]
        period: Period,
    },
    /// Search questions by keyword.
    Search {
        #[arg(long, default_value = "")]
        keyword: String,
        #[arg(long, value_enum, default_value_t = QuestionSort::CreatedAt)]
        sort: QuestionSort,
    },
    /// Show one question.
    Show { id: u64 },
    /// List the answers to a question.
    Answers { question_id: u64 },
    /// Questions written by a user.
    Previews {
        user_id: u64,
        #[arg(long, value_enum, default_value_t = QuestionSort::CreatedAt)]
        sort: QuestionSort,
    },
    /// Questions scrapped by the token's owner.
    Scraps,
    /// Answer a question.
    Answer {
        question_id: u64,
        #[arg(long)]
        body: String,
    },
    /// Toggle your like on a question.
    Like { question_id: u64 },
    /// Delete a question.
    Delete { id: u64 },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }

    let app = App::from_config(&config).context("building API client")?;
    if let Some(token) = cli.token {
        app.set_access_token(Some(SecureString::new(token)));
    }

    app.questions.subscribe(|| tracing::debug!(store = "questions", "State published"));
    app.answers.subscribe(|| tracing::debug!(store = "answers", "State published"));

    match cli.command {
        Command::Top { period } => {
            app.top_questions.fetch_questions(period).await?;
            print_json(&app.top_questions.questions())?;
        }
        Command::Search { keyword, sort } => {
            app.questions.change_keyword(keyword);
            app.questions.fetch_questions(sort, &app.questions.keyword()).await;
            print_json(&app.questions.questions())?;
        }
        Command::Show { id } => {
            app.questions.fetch_question(id).await;
            match app.questions.question() {
                Some(question) => print_json(&question)?,
                None => bail!("question {} could not be loaded", id),
            }
        }
        Command::Answers { question_id } => {
            app.answers.fetch_answers(question_id).await;
            print_json(&app.answers.answers())?;
        }
        Command::Previews { user_id, sort } => {
            app.questions.fetch_question_previews(user_id, sort).await;
            print_json(&app.questions.state().question_previews)?;
        }
        Command::Scraps => {
            app.questions.fetch_scrapped_questions().await;
            let state = app.questions.state();
            if state.scrapped_questions_status.is_failed() {
                bail!("scrapped questions could not be loaded (is --token set?)");
            }
            print_json(&state.scrapped_questions)?;
        }
        Command::Answer { question_id, body } => {
            app.answers.write(NewAnswer { question_id, body }).await;
            if !app.answers.is_write_successful() {
                bail!("answer was not created");
            }
            print_json(&app.answers.answers())?;
        }
        Command::Like { question_id } => {
            app.questions.fetch_question(question_id).await;
            if app.questions.question().is_none() {
                bail!("question {} could not be loaded", question_id);
            }
            app.questions.toggle_like(question_id).await?;
            if let Some(question) = app.questions.question() {
                print_json(&question.like_user_ids)?;
            }
        }
        Command::Delete { id } => {
            app.questions.delete(id).await;
            if !app.questions.is_delete_successful() {
                bail!("question {} was not deleted", id);
            }
            println!("deleted question {}", id);
        }
    }

    Ok(())
}
