//! Moodwell CLI
//!
//! Usage:
//!   moodwell --serve                          # HTTP API server
//!   moodwell --text "your text here"          # Classify one text
//!   moodwell --text "text" --rating 4         # Classify and build a plan
//!   moodwell --text "text" --json             # JSON output
//!   moodwell --interactive                    # Classify lines from stdin
//!   moodwell --populate-demo                  # Fill the store with samples
//!   moodwell --reset                          # Delete every record

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use moodwell::config::{AppConfig, DEFAULT_ADDR, DEFAULT_DB_PATH};
use moodwell::core::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use moodwell::core::{demo, run_server, EmotionDetector, SelfHelpToolkit};
use moodwell::types::{ClassificationOutput, MoodBand};
use moodwell::{MOOD_RATING_MAX, MOOD_RATING_MIN, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "moodwell",
    version = VERSION,
    about = "Moodwell - emotion-aware mood journal and self-help chatbot backend",
    long_about = "Moodwell scores text over eleven emotion labels, stores mood entries and\n\
                  chat exchanges, recommends self-help exercises and reports weekly trends.\n\n\
                  Modes:\n  \
                  --serve          HTTP API server\n  \
                  --text           Classify a single text\n  \
                  --interactive    Classify lines from stdin\n  \
                  --populate-demo  Insert sample records\n  \
                  --reset          Delete every record\n\n\
                  Mood bands:\n  \
                  LOW     - rating 1-4\n  \
                  MEDIUM  - rating 5-7\n  \
                  HIGH    - rating 8-10"
)]
struct Args {
    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, env = "MOODWELL_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// SQLite database file
    #[arg(long, env = "MOODWELL_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Chat completion base URL
    #[arg(long, env = "MOODWELL_LLM_URL", default_value = DEFAULT_BASE_URL)]
    llm_url: String,

    /// Chat completion model
    #[arg(long, env = "MOODWELL_LLM_MODEL", default_value = DEFAULT_MODEL)]
    llm_model: String,

    /// API key for the chat completion service
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Emotion classifier endpoint; keyword estimator when absent
    #[arg(long, env = "MOODWELL_EMOTION_MODEL_URL")]
    emotion_model_url: Option<String>,

    /// Text-to-speech server base URL
    #[arg(long, env = "MOODWELL_TTS_URL")]
    tts_url: Option<String>,

    /// Speech-to-text server base URL
    #[arg(long, env = "MOODWELL_STT_URL")]
    stt_url: Option<String>,

    /// Seed for recommendation sampling
    #[arg(long, env = "MOODWELL_SEED")]
    seed: Option<u64>,

    /// Text to classify (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Mood rating 1-10; adds a personalized plan to the classification
    #[arg(short, long)]
    rating: Option<i64>,

    /// Interactive mode - classify each line read from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Insert the sample mood entries, chats and activities
    #[arg(long)]
    populate_demo: bool,

    /// Delete every stored record
    #[arg(long)]
    reset: bool,
}

impl Args {
    fn config(&self) -> AppConfig {
        AppConfig {
            addr: self.addr.clone(),
            db_path: self.db.clone(),
            llm_url: self.llm_url.clone(),
            llm_model: self.llm_model.clone(),
            api_key: self.api_key.clone(),
            emotion_model_url: self.emotion_model_url.clone(),
            tts_url: self.tts_url.clone(),
            stt_url: self.stt_url.clone(),
            seed: self.seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stderr only; stdout carries CLI output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }
    let config = args.config();

    if let Some(rating) = args.rating {
        if !(MOOD_RATING_MIN..=MOOD_RATING_MAX).contains(&rating) {
            anyhow::bail!(
                "--rating must be between {} and {}, got {}",
                MOOD_RATING_MIN,
                MOOD_RATING_MAX,
                rating
            );
        }
    }

    if args.reset {
        run_reset(&config)
    } else if args.populate_demo {
        run_populate(&config)
    } else if args.serve {
        run_serve(&config).await
    } else if let Some(ref text) = args.text {
        run_single(text, &args, &config).await
    } else {
        run_interactive(&args, &config).await
    }
}

/// Classify one text and print it
async fn run_single(text: &str, args: &Args, config: &AppConfig) -> Result<()> {
    let detector = config.detector();
    let output = classify(&detector, text, args.rating, config).await;
    print_output(&output, args)
}

/// Classify each stdin line until EOF or `quit`
async fn run_interactive(args: &Args, config: &AppConfig) -> Result<()> {
    let detector = config.detector();

    print_header(args.no_color);
    println!("Type how you feel and press Enter. Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut count = 0usize;

    loop {
        print!("{} ", ">".bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let output = classify(&detector, line, args.rating, config).await;
        print_output(&output, args)?;
        count += 1;
    }

    println!("\nSession ended. Texts classified: {}", count);
    Ok(())
}

async fn classify(
    detector: &EmotionDetector,
    text: &str,
    rating: Option<i64>,
    config: &AppConfig,
) -> ClassificationOutput {
    let emotions = detector.detect_emotions(text).await;
    let output = ClassificationOutput::new(emotions);
    match rating {
        Some(rating) => {
            let mut rng = config.rng();
            let plan = SelfHelpToolkit::new().create_personalized_plan(
                rating,
                &output.dominant_emotion,
                &mut rng,
            );
            output.with_plan(rating, plan)
        }
        None => output,
    }
}

fn print_output(output: &ClassificationOutput, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }
    Ok(())
}

fn run_populate(config: &AppConfig) -> Result<()> {
    let store = config
        .open_store()
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let existing = store.counts()?;
    if existing.total() > 0 {
        println!(
            "Store already holds {} records; adding samples on top.",
            existing.total()
        );
    }

    let added = demo::populate_demo(&store, &mut config.rng(), Utc::now())?;
    println!(
        "{} {} mood entries, {} chat messages, {} activities",
        "Added".green().bold(),
        added.mood_entries,
        added.chat_messages,
        added.self_help_activities
    );
    Ok(())
}

fn run_reset(config: &AppConfig) -> Result<()> {
    let store = config
        .open_store()
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let removed = demo::reset(&store)?;
    println!(
        "{} {} mood entries, {} chat messages, {} activities",
        "Removed".yellow().bold(),
        removed.mood_entries,
        removed.chat_messages,
        removed.self_help_activities
    );
    Ok(())
}

async fn run_serve(config: &AppConfig) -> Result<()> {
    let state = config
        .build_state()
        .with_context(|| format!("opening {}", config.db_path.display()))?;

    print_header(false);
    run_server(&config.addr, Arc::new(state))
        .await
        .with_context(|| format!("serving on {}", config.addr))
}

fn print_header(no_color: bool) {
    let title = format!("Moodwell v{}", VERSION);
    if no_color {
        println!("{}", title);
    } else {
        println!(
            "{} {}  {}",
            MoodBand::High.emoji(),
            title.bold(),
            "emotion-aware mood journal".dimmed()
        );
    }
    println!();
}
