//! CLI binary for quickmanual.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig`, drives a `Session` and prints the summary cards.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use quickmanual::config::{DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use quickmanual::document::guess_mode;
use quickmanual::{
    backend_from_config, AnalysisConfig, AnalysisProgressCallback, BackendKind, CommandCamera,
    InputMode, Language, ProgressCallback, Session, SummaryRecord,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the single analysis request is outstanding.
struct SpinnerCallback {
    bar: ProgressBar,
}

impl SpinnerCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar })
    }
}

impl AnalysisProgressCallback for SpinnerCallback {
    fn on_analysis_start(&self, filename: &str, media_type: &str) {
        // Ticking starts here so nothing is drawn if we bail out earlier.
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.set_prefix("Reading");
        self.bar.set_message(format!("{filename} {}", dim(media_type)));
    }

    fn on_request_sent(&self, model: &str, payload_bytes: usize) {
        self.bar.set_prefix("Analysing");
        if payload_bytes > 0 {
            self.bar
                .set_message(format!("{model} {}", dim(&format!("{} KiB", payload_bytes / 1024))));
        } else {
            self.bar.set_message(model.to_string());
        }
    }

    fn on_analysis_complete(&self, product: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", green("✔"), bold(product));
    }

    fn on_analysis_error(&self, _error: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise a PDF manual
  quickmanual manual.pdf

  # Identify a product from a photo, answer in English
  quickmanual --lang en kettle.jpg

  # Take the photo with a webcam
  quickmanual --capture-cmd "fswebcam --no-banner -"

  # Try the interface without an API key
  quickmanual --demo manual.pdf

  # Machine-readable output
  quickmanual --json manual.pdf > summary.json

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY          Messages API key (required unless --demo)
  QUICKMANUAL_MODEL          Override model ID
  QUICKMANUAL_ENDPOINT       Override messages endpoint URL
  QUICKMANUAL_LANG           Summary language (fr, en)
  QUICKMANUAL_CAPTURE_CMD    Camera capture command (writes one JPEG to stdout)
"#;

/// Summarise product manuals and product photos with a multimodal LLM.
#[derive(Parser, Debug)]
#[command(
    name = "quickmanual",
    version,
    about = "Summarise product manuals and product photos with a multimodal LLM",
    long_about = "Turn a PDF manual, or a photo of a product, into four short cards: \
quick start, safety, maintenance and troubleshooting. The document is sent once to the \
messages API; nothing is retried automatically.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF manual or product photo. Not needed with --capture-cmd.
    #[arg(required_unless_present = "capture_cmd")]
    input: Option<PathBuf>,

    /// Input mode. `auto` picks from the file content.
    #[arg(long, env = "QUICKMANUAL_MODE", value_enum, default_value = "auto")]
    mode: ModeArg,

    /// Take the photo with this capture command instead of reading a file.
    #[arg(long, env = "QUICKMANUAL_CAPTURE_CMD", conflicts_with = "input")]
    capture_cmd: Option<String>,

    /// Use built-in sample summaries instead of calling the API.
    #[arg(long, env = "QUICKMANUAL_DEMO")]
    demo: bool,

    /// Language of the summary.
    #[arg(long, env = "QUICKMANUAL_LANG", value_enum, default_value = "fr")]
    lang: LangArg,

    /// Messages API key.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model ID.
    #[arg(long, env = "QUICKMANUAL_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Messages endpoint URL.
    #[arg(long, env = "QUICKMANUAL_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Maximum tokens in the reply.
    #[arg(long, env = "QUICKMANUAL_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Request timeout in seconds (default: none).
    #[arg(long, env = "QUICKMANUAL_TIMEOUT")]
    timeout: Option<u64>,

    /// Print the summary as JSON.
    #[arg(long, env = "QUICKMANUAL_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "QUICKMANUAL_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "QUICKMANUAL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, env = "QUICKMANUAL_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Auto,
    Pdf,
    Image,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LangArg {
    Fr,
    En,
}

impl From<LangArg> for Language {
    fn from(v: LangArg) -> Self {
        match v {
            LangArg::Fr => Language::Fr,
            LangArg::En => Language::En,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides all the feedback that matters; keep INFO logs
    // from tearing through it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress && !cli.verbose {
        Some(SpinnerCallback::new() as Arc<dyn AnalysisProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // No key: warn and stop before touching the network.
    if let Some(warning) = config.api_key_warning() {
        print_banner(&warning.to_string());
        std::process::exit(2);
    }

    // ── Select the document ──────────────────────────────────────────────
    let mode = match (cli.mode, &cli.input) {
        (ModeArg::Pdf, _) => InputMode::Pdf,
        (ModeArg::Image, _) => InputMode::Image,
        (ModeArg::Auto, Some(path)) => guess_mode(path),
        (ModeArg::Auto, None) => InputMode::Image,
    };
    let mut session = Session::new(mode);

    let selected = match (&cli.capture_cmd, &cli.input) {
        (Some(cmd), _) => {
            let camera = CommandCamera::from_command_line(cmd)
                .context("--capture-cmd must name a program")?;
            session.switch_mode(InputMode::Image);
            session
                .start_camera(&camera)
                .and_then(|()| session.capture_photo())
        }
        (None, Some(path)) => session.select_file(path),
        (None, None) => unreachable!("clap requires INPUT unless --capture-cmd is set"),
    };
    if let Err(e) = selected {
        fail(&e.to_string());
    }

    // ── Run analysis ─────────────────────────────────────────────────────
    let backend = backend_from_config(&config).context("Could not set up the analysis backend")?;
    let summary = match session.analyze(backend.as_ref()).await {
        Ok(summary) => summary.clone(),
        Err(e) => fail(&e.to_string()),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else {
        print_cards(&summary, config.language);
    }

    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .backend(if cli.demo {
            BackendKind::Demo
        } else {
            BackendKind::Live
        })
        .language(cli.lang.into())
        .model(&cli.model)
        .endpoint(&cli.endpoint)
        .max_tokens(cli.max_tokens);

    builder = match cli.api_key.as_deref() {
        Some(key) => builder.api_key(key),
        None => builder.without_api_key(),
    };
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print the single inline error message and exit.
fn fail(message: &str) -> ! {
    eprintln!("{} {}", red("✗"), red(message));
    std::process::exit(1);
}

fn print_banner(message: &str) {
    let lines: Vec<&str> = message.lines().collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    let rule = "─".repeat(width);
    eprintln!("{}", yellow(&format!("┌{rule}┐")));
    for line in lines {
        let pad = width - 2 - line.chars().count();
        eprintln!(
            "{}  {}{}{}",
            yellow("│"),
            bold(line),
            " ".repeat(pad),
            yellow("│")
        );
    }
    eprintln!("{}", yellow(&format!("└{rule}┘")));
}

fn print_cards(summary: &SummaryRecord, language: Language) {
    println!();
    println!("{} {}", cyan("◆"), bold(&summary.product));
    for (icon, section) in ["⚡", "🛡", "🔧", "🩺"].iter().zip(summary.sections(language)) {
        println!();
        println!("  {} {}", icon, bold(section.label));
        for line in wrap(section.body, 72) {
            println!("    {line}");
        }
    }
    println!();
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
