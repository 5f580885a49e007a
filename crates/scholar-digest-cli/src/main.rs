use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use scholar_digest_core::{ExtractOptions, LayoutSchema, extract_and_aggregate};
use scholar_digest_mail::{GmailClient, fixtures};
use scholar_digest_reporting::{ReportFormat, render};

mod config;
mod output;

/// Aggregates Google Scholar alert emails into a single digest report.
#[derive(Parser, Debug)]
#[command(name = "scholar-digest", version, about, long_about = None)]
struct Cli {
    /// Gmail label holding the Scholar alert emails (env SAD_LABEL overrides)
    #[arg(short, long)]
    label: Option<String>,

    /// Report format: markdown, html, json or jsonl
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Extract paper authors from the author/venue line
    #[arg(long)]
    authors: bool,

    /// Track per-paper references back to the observing messages
    #[arg(long)]
    refs: bool,

    /// Add an archive section aggregated from already-read emails
    #[arg(long)]
    read: bool,

    /// Only aggregate and print email subjects
    #[arg(long)]
    subjects: bool,

    /// Mark the aggregated unread emails as read afterwards
    #[arg(long)]
    mark_read: bool,

    /// List all Gmail labels and exit
    #[arg(long)]
    labels: bool,

    /// Number of concurrent Gmail API requests
    #[arg(short = 'n', long)]
    concurrency: Option<usize>,

    /// Read messages from a JSON fixture file instead of Gmail
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_cfg = config::load_config();

    let label = cli
        .label
        .clone()
        .or_else(|| std::env::var("SAD_LABEL").ok())
        .or_else(|| file_cfg.label.clone())
        .unwrap_or_else(|| "scholar-alerts".to_string());
    let format = match cli.format {
        Some(f) => f,
        None => file_cfg
            .format
            .as_deref()
            .map(|f| f.parse::<ReportFormat>().map_err(anyhow::Error::msg))
            .transpose()
            .context("invalid `format` in config file")?
            .unwrap_or(ReportFormat::Markdown),
    };
    let concurrency = cli
        .concurrency
        .or(file_cfg.concurrency)
        .unwrap_or(10);

    let client = if cli.fixture.is_none() {
        Some(gmail_client(&file_cfg)?)
    } else {
        None
    };

    if cli.labels {
        let client = client.as_ref().context("--labels requires Gmail access")?;
        for l in client.list_labels().await? {
            println!("{}", l.name);
        }
        return Ok(());
    }

    let (unread, read_msgs) = match (&cli.fixture, &client) {
        (Some(path), _) => {
            let msgs = fixtures::read_messages(path)
                .with_context(|| format!("reading fixture {}", path.display()))?;
            (msgs, Vec::new())
        }
        (None, Some(client)) => {
            let unread = client
                .fetch_messages(&format!("label:{label} is:unread"), concurrency)
                .await?;
            let read_msgs = if cli.read {
                client
                    .fetch_messages(&format!("label:{label} is:read"), concurrency)
                    .await?
            } else {
                Vec::new()
            };
            (unread, read_msgs)
        }
        (None, None) => unreachable!("client is constructed whenever no fixture is given"),
    };

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    if cli.subjects {
        output::print_subjects(&mut out, &unread)?;
        return Ok(());
    }

    let schema = LayoutSchema::scholar();
    let opts = ExtractOptions {
        include_authors: cli.authors,
        track_refs: cli.refs,
    };
    let (stats, unread_agg) = extract_and_aggregate(&unread, &schema, opts);
    let read_agg = if cli.read && !read_msgs.is_empty() {
        Some(extract_and_aggregate(&read_msgs, &schema, opts).1)
    } else {
        None
    };

    render(&mut out, format, &stats, &unread_agg, read_agg.as_ref())?;

    if cli.mark_read {
        let client = client
            .as_ref()
            .context("--mark-read requires Gmail access")?;
        client.mark_read(&unread).await?;
        tracing::info!(count = unread.len(), "marked messages as read");
    }

    if stats.errors != 0 {
        eprintln!("Errors: {}", stats.errors);
    }
    Ok(())
}

fn gmail_client(cfg: &config::ConfigFile) -> anyhow::Result<GmailClient> {
    let token = std::env::var("GMAIL_TOKEN")
        .ok()
        .or_else(|| cfg.token.clone())
        .context("no Gmail access token: set GMAIL_TOKEN or `token` in the config file")?;
    Ok(GmailClient::new(token))
}
