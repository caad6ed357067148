//! precis-cli — terminal front end for the Precis summarization server
//!
//! Talks only to the server's HTTP API; the Gemini credential never leaves
//! the server.
//!
//! # Subcommands
//! - `summarize [TEXT] [--file PATH] [--json]` — summarize text (stdin if neither given)
//! - `history [-n <limit>] [--json]`           — list recently saved summaries
//! - `status`                                  — show server health

mod form;

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use form::{FormState, SummarizeBackend};

const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Upstream calls are bounded at 30s server-side; leave headroom.
const SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "precis-cli", version, about = "Summarize text with a Precis server")]
struct Cli {
    /// Precis server URL (overrides PRECIS_SERVER_URL env var)
    #[arg(long, env = "PRECIS_SERVER_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Summarize text given as an argument, a file, or stdin
    Summarize {
        /// Text to summarize
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the raw JSON response body
        #[arg(long)]
        json: bool,
    },

    /// List recently saved summaries
    History {
        /// Maximum number of summaries to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,

        /// Print the raw JSON response body
        #[arg(long)]
        json: bool,
    },

    /// Show server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Error body returned by the server on 4xx/5xx.
#[derive(Debug, Deserialize, Default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub input_text: String,
    pub summary_text: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub summaries: Vec<HistoryEntry>,
    pub count: usize,
}

/// Render a server error body as a single line for display.
pub fn error_message(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    match (parsed.error, parsed.details) {
        (Some(error), Some(details)) => format!("{}: {}", error, details),
        (Some(error), None) => error,
        _ => format!("server returned HTTP {}", status),
    }
}

/// One-line preview of `text`, capped at `max` characters.
pub fn preview(text: &str, max: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

struct HttpBackend {
    client: reqwest::blocking::Client,
    url: String,
    json_output: bool,
}

impl HttpBackend {
    fn new(server: &str, json_output: bool) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(SUMMARIZE_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/api/summarize", server),
            json_output,
        })
    }
}

impl SummarizeBackend for HttpBackend {
    fn summarize(&self, text: &str) -> Result<String, String> {
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .map_err(|e| format!("connection failed to {}: {}", self.url, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| format!("failed to read response: {}", e))?;

        if !status.is_success() {
            return Err(error_message(status.as_u16(), &body));
        }

        if self.json_output {
            return Ok(body);
        }

        serde_json::from_str::<SummarizeResponse>(&body)
            .map(|r| r.summary)
            .map_err(|e| format!("failed to parse summarize response: {}", e))
    }
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn do_summarize(
    server: &str,
    text: Option<String>,
    file: Option<PathBuf>,
    json_output: bool,
) -> anyhow::Result<()> {
    let backend = HttpBackend::new(server, json_output)?;
    let mut form = FormState::new(read_input(text, file)?);

    if !json_output {
        eprintln!("Summarizing…");
    }
    form.submit(&backend);

    if form.has_error() {
        eprintln!("precis-cli: {}", form.error_message);
        std::process::exit(1);
    }

    println!("{}", form.summary_text);
    Ok(())
}

fn do_history(server: &str, limit: usize, json_output: bool) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let url = format!("{}/api/summaries", server);
    let resp = match client.get(&url).query(&[("limit", limit)]).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("precis-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        eprintln!("precis-cli: {}", error_message(status.as_u16(), &body));
        std::process::exit(1);
    }

    if json_output {
        println!("{}", body);
        return Ok(());
    }

    let history: HistoryResponse = serde_json::from_str(&body)?;
    if history.count == 0 {
        eprintln!("No saved summaries (is the server's database connected?)");
        return Ok(());
    }
    for entry in &history.summaries {
        println!("{} {}", entry.created_at, entry.id);
        println!("  Input:   {}", preview(&entry.input_text, 72));
        println!("  Summary: {}\n", preview(&entry.summary_text, 72));
    }

    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server);
    let resp = client.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Precis server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:       {}", body["version"].as_str().unwrap_or("?"));
            println!("Database:      {}", body["database"].as_str().unwrap_or("?"));
            println!("Gemini API:    {}", body["gemini_api"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            eprintln!("precis-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("precis-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Summarize { text, file, json } => do_summarize(&server, text, file, json),
        Commands::History { limit, json } => do_history(&server, limit, json),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("precis-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
