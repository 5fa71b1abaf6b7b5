//! Question management commands (`question add`, `seed`)

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::{Parser, Subcommand};

use polls_server::polls::seed_sample;
use polls_server::{NewQuestion, PollStore, PollsConfig, QuestionWithChoices};

use super::connect;

#[derive(Parser, Debug)]
pub struct QuestionArgs {
    #[command(subcommand)]
    pub command: QuestionCommands,
}

#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    /// Create a question with its choices
    Add(AddArgs),
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Question text (at most 200 characters)
    #[arg(long, short = 't')]
    pub text: String,

    /// Choice text; repeat for each choice
    #[arg(long = "choice", short = 'c', value_name = "TEXT")]
    pub choices: Vec<String>,

    /// Seconds from now until the question is published (negative backdates it)
    #[arg(long, value_name = "SECS", default_value_t = 0, allow_hyphen_values = true)]
    pub publish_in: i64,
}

pub async fn run_question(args: QuestionArgs, config: PollsConfig) -> Result<()> {
    match args.command {
        QuestionCommands::Add(add) => run_add(add, config).await,
    }
}

async fn run_add(args: AddArgs, config: PollsConfig) -> Result<()> {
    let pub_date = publish_date(Utc::now(), args.publish_in)?;

    // Reject bad input before touching the database
    let new = NewQuestion::new(&args.text, pub_date, &args.choices)
        .context("Invalid question")?;

    let store = connect(&config).await?;
    let created = store
        .create_question(new)
        .await
        .context("Failed to create question")?;

    print_question(&created);
    Ok(())
}

/// Insert the sample "What's new?" question
pub async fn run_seed(config: PollsConfig) -> Result<()> {
    let store = connect(&config).await?;
    let seeded = seed_sample(&store, Utc::now())
        .await
        .context("Failed to seed sample question")?;

    print_question(&seeded);
    Ok(())
}

fn publish_date(now: DateTime<Utc>, publish_in: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_seconds(publish_in)
        .and_then(|delta| now.checked_add_signed(delta))
        .with_context(|| format!("--publish-in {} is out of range", publish_in))
}

fn print_question(created: &QuestionWithChoices) {
    let q = &created.question;
    println!(
        "Created question {} ({}): {}",
        q.id,
        q.pub_date.to_rfc3339(),
        q.question_text
    );
    for choice in &created.choices {
        println!("  choice {}: {}", choice.id, choice.choice_text);
    }
}
