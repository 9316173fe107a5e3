//! CLI entry point for stress-diagnose.
//!
//! Collects the twenty survey answers from a file, flags or the terminal
//! and asks the prediction service for a stress level.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use predict_client::{FormController, PredictConfig, ReqwestTransport};
use survey_types::{FIELD_KEYS, FormState, Outcome, field_label};
use tracing_subscriber::EnvFilter;

/// stress-diagnose: Student stress prediction from the terminal
#[derive(Parser)]
#[command(name = "stress-diagnose")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the survey fields
    Fields,

    /// Print an empty answers file to fill in
    Template,

    /// Submit answers and print the predicted stress level
    Diagnose {
        /// JSON file with answers (field -> number or string)
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Set one answer, overriding the answers file
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Prediction endpoint (default: $STRESS_PREDICT_URL, then the hosted service)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: u64,

        /// Fail instead of prompting for missing answers
        #[arg(long)]
        no_prompt: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim();
    if !FIELD_KEYS.contains(&key) {
        return Err(format!("unknown survey field `{key}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fields => {
            list_fields();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Template => {
            println!("{}", serde_json::to_string_pretty(&FormState::new())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Diagnose {
            answers,
            set,
            endpoint,
            timeout_secs,
            no_prompt,
            json,
        } => {
            let config = PredictConfig {
                timeout: Some(Duration::from_secs(timeout_secs)),
                ..PredictConfig::from_env()
            }
            .with_endpoint_override(endpoint);
            run_diagnose(answers.as_deref(), &set, &config, no_prompt, json).await
        }
    }
}

fn list_fields() {
    let width = FIELD_KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
    for key in FIELD_KEYS {
        println!("{key:<width$}  {}", field_label(key));
    }
}

async fn run_diagnose(
    answers: Option<&Path>,
    overrides: &[(String, String)],
    config: &PredictConfig,
    no_prompt: bool,
    json: bool,
) -> Result<ExitCode> {
    let mut form = match answers {
        Some(path) => load_answers(path)?,
        None => FormState::new(),
    };
    for (key, value) in overrides {
        form.set(key, value.as_str())?;
    }

    if !no_prompt && !form.missing_fields().is_empty() {
        let stdin = std::io::stdin();
        form = prompt_missing(form, stdin.lock(), std::io::stderr())?;
    }

    form.check_native_constraints()
        .context("Answers are incomplete")?;

    tracing::info!(endpoint = %config.endpoint, "requesting diagnosis");

    let transport = ReqwestTransport::new(config).context("Failed to build HTTP client")?;
    let mut controller = FormController::with_form(form);
    let outcome = controller
        .run_submit(&transport, config)
        .await
        .unwrap_or(Outcome::Missing);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match controller.result_text() {
            Some(text) => println!("Result: {text}"),
            None => eprintln!("The service replied without a stress level."),
        }
    }

    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Label(_) | Outcome::Raw(_) => ExitCode::SUCCESS,
        Outcome::ServerError(_) | Outcome::Missing => ExitCode::from(1),
        Outcome::Unreachable => ExitCode::from(2),
    }
}

fn load_answers(path: &Path) -> Result<FormState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers from {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Answers file {} is not valid JSON", path.display()))?;
    FormState::from_answers(&value)
        .with_context(|| format!("Invalid answers in {}", path.display()))
}

/// Ask for each empty field until it holds a number, the way a required
/// numeric input refuses to submit.
fn prompt_missing<R: BufRead, W: Write>(
    mut form: FormState,
    mut input: R,
    mut output: W,
) -> Result<FormState> {
    for key in form.missing_fields() {
        loop {
            write!(output, "{}: ", field_label(key))?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                anyhow::bail!("Input ended before `{key}` was answered");
            }

            let value = line.trim();
            match value.parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    form.set(key, value)?;
                    break;
                }
                _ => writeln!(output, "  please enter a number")?,
            }
        }
    }
    Ok(form)
}
