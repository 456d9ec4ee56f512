use anyhow::Result;
use clap::Parser;
use quizically::models::Config;
use quizically::pipeline::{PersistenceOutcome, Pipeline};
use quizically::store::{COLLECTION, DATABASE};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "quizically")]
#[command(about = "Generate trivia questions and answers with Gemini")]
struct CliArgs {
    /// Topic to ask about. Prompts interactively when omitted.
    #[arg(long)]
    topic: Option<String>,

    /// Number of questions. Defaults to 10.
    #[arg(long, value_name = "N")]
    count: Option<String>,
}

const DEFAULT_COUNT: &str = "10";

/// Blank count input means the default.
fn count_or_default(raw: &str) -> &str {
    if raw.trim().is_empty() {
        DEFAULT_COUNT
    } else {
        raw
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizically=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = match Pipeline::from_config(&config).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to initialize pipeline: {}", e);
            std::process::exit(1);
        }
    };

    match (args.topic, args.count) {
        (Some(topic), count) => {
            let count = count.unwrap_or_default();
            if !run_request(&pipeline, &topic, count_or_default(&count)).await {
                std::process::exit(1);
            }
        }
        (topic, count) => run_interactive(&pipeline, topic, count).await?,
    }

    Ok(())
}

/// Run one request and print its outcomes. Returns `false` when generation failed.
async fn run_request(pipeline: &Pipeline, topic: &str, count: &str) -> bool {
    let generated = match pipeline.request_trivia(topic, count).await {
        Ok(generated) => generated,
        Err(e) => {
            eprintln!("Error: {}", e);
            return false;
        }
    };

    println!("{}", generated.result.raw_text.trim_end());

    match generated.persistence.outcome().await {
        PersistenceOutcome::Persisted => {
            eprintln!("Trivia stored in {}.{}", DATABASE, COLLECTION)
        }
        PersistenceOutcome::PersistFailed(e) => eprintln!("Database error: {}", e),
    }

    true
}

async fn run_interactive(
    pipeline: &Pipeline,
    mut topic: Option<String>,
    mut count: Option<String>,
) -> Result<()> {
    info!("Interactive mode; enter 'quit' or press Ctrl-D to exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(topic_raw) = take_or_ask(&mut topic, &mut lines, "Topic: ").await? else {
            break;
        };
        let Some(count_raw) = take_or_ask(
            &mut count,
            &mut lines,
            &format!("Number of Questions [{}]: ", DEFAULT_COUNT),
        )
        .await?
        else {
            break;
        };

        run_request(pipeline, &topic_raw, count_or_default(&count_raw)).await;
        println!();
    }

    Ok(())
}

/// Use a value given on the command line once, then fall back to stdin.
/// `None` means the user asked to stop.
async fn take_or_ask(
    preset: &mut Option<String>,
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
) -> Result<Option<String>> {
    if let Some(value) = preset.take() {
        return Ok(Some(value));
    }

    print!("{}", label);
    std::io::stdout().flush()?;

    match lines.next_line().await? {
        Some(line) if line.trim().eq_ignore_ascii_case("quit") => Ok(None),
        Some(line) => Ok(Some(line)),
        None => Ok(None),
    }
}
