use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use repodoc_generation::build_prompt;
use repodoc_ingest::{ingest_repository, prepare_units, Credentials, IngestConfig, IngestOutput};
use serde::Serialize;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

mod report;

const TOKEN_ENV: &str = "REPODOC_GIT_TOKEN";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "repodoc")]
#[command(about = "Repository ingestion and structural digests for documentation generation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository, list it and extract its source files
    Ingest(IngestArgs),

    /// Print the structural digest of one JavaScript/TypeScript file
    Summarize(SummarizeArgs),

    /// Print the documentation prompt for every extracted file
    Prompts(PromptsArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Repository URL (https, ssh, scp-like or file://)
    url: String,

    /// TOML file with ingestion settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of files whose content is extracted
    #[arg(long)]
    max_files: Option<usize>,

    /// Files larger than this are listed but not read
    #[arg(long)]
    max_file_bytes: Option<u64>,

    /// Keep raw file content instead of structural digests
    #[arg(long)]
    raw: bool,

    /// Bearer token for private repositories (env: REPODOC_GIT_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Extra HTTP header for the clone, as "Name: value" (repeatable)
    #[arg(long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Directory for temporary clones (default: system temp dir)
    #[arg(long)]
    temp_dir: Option<PathBuf>,
}

impl SourceArgs {
    fn ingest_config(&self) -> Result<IngestConfig> {
        let mut config = match &self.config {
            Some(path) => IngestConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => IngestConfig::default(),
        };
        if let Some(max_files) = self.max_files {
            config.max_files = max_files;
        }
        if let Some(max_file_bytes) = self.max_file_bytes {
            config.max_file_bytes = max_file_bytes;
        }
        if self.raw {
            config.summarize = false;
        }
        if let Some(dir) = &self.temp_dir {
            config.temp_root = Some(dir.clone());
        }
        Ok(config)
    }

    fn credentials(&self) -> Result<Credentials> {
        let bearer_token = self
            .token
            .clone()
            .or_else(|| env::var(TOKEN_ENV).ok())
            .filter(|token| !token.trim().is_empty());
        let headers = self
            .headers
            .iter()
            .map(|raw| parse_header(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(Credentials {
            bearer_token,
            headers,
        })
    }

    async fn ingest(&self) -> Result<(IngestOutput, IngestConfig)> {
        let config = self.ingest_config()?;
        let credentials = self.credentials()?;
        let output = ingest_repository(&self.url, &credentials, &config)
            .await
            .context("Ingestion failed")?;
        Ok((output, config))
    }
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("Header must look like \"Name: value\", got {raw:?}");
    };
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        bail!("Invalid header name in {raw:?}");
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[derive(Args)]
struct IngestArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct SummarizeArgs {
    /// JavaScript or TypeScript file
    file: PathBuf,

    /// Pretty-print the digest
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct PromptsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PromptEntry<'a> {
    path: &'a str,
    prompt: String,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout carries data for these; keep logs to warnings
    let machine_output = match &cli.command {
        Commands::Ingest(args) => args.json,
        Commands::Summarize(_) => true,
        Commands::Prompts(args) => args.json,
    };
    if machine_output && !cli.verbose {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Ingest(args) => run_ingest(args).await,
        Commands::Summarize(args) => run_summarize(args),
        Commands::Prompts(args) => run_prompts(args).await,
    }
}

async fn run_ingest(args: IngestArgs) -> Result<()> {
    let (output, _) = args.source.ingest().await?;
    if args.json {
        let text = if args.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        print_stdout(&text)
    } else {
        print_stdout(&report::render_ingest_report(&output))
    }
}

fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let path = args.file.to_string_lossy().replace('\\', "/");
    let digest = repodoc_summarizer::summarize(&path, &source)
        .with_context(|| format!("Failed to summarize {path}"))?;
    log::debug!("{path}: {} nodes", digest.node_count());

    if args.pretty {
        print_stdout(&digest.to_pretty_digest())
    } else {
        print_stdout(&digest.to_digest())
    }
}

async fn run_prompts(args: PromptsArgs) -> Result<()> {
    let (output, config) = args.source.ingest().await?;
    let units = prepare_units(&output.walk, &config);
    let repo_name = output.repository.display_name();
    let entries: Vec<PromptEntry> = units
        .iter()
        .map(|unit| PromptEntry {
            path: &unit.path,
            prompt: build_prompt(&repo_name, &output.walk.structure, unit),
        })
        .collect();

    if args.json {
        print_stdout(&serde_json::to_string(&entries)?)
    } else {
        let sections: Vec<(&str, &str)> = entries
            .iter()
            .map(|entry| (entry.path, entry.prompt.as_str()))
            .collect();
        print_stdout(&report::render_prompts(&sections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_split_on_the_first_colon() {
        assert_eq!(
            parse_header("X-Trace: a:b").unwrap(),
            ("X-Trace".to_string(), "a:b".to_string())
        );
        assert!(parse_header("no colon").is_err());
        assert!(parse_header(": value").is_err());
        assert!(parse_header("Bad Name: value").is_err());
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repodoc.toml");
        fs::write(&path, "max_files = 3\nmax_file_bytes = 100\n").unwrap();

        let cli = Cli::parse_from([
            "repodoc",
            "ingest",
            "https://example.com/a/b.git",
            "--config",
            path.to_str().unwrap(),
            "--max-files",
            "7",
            "--raw",
        ]);
        let Commands::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        let config = args.source.ingest_config().unwrap();
        assert_eq!(config.max_files, 7);
        assert_eq!(config.max_file_bytes, 100);
        assert!(!config.summarize);
    }

    #[test]
    fn explicit_token_wins() {
        let cli = Cli::parse_from([
            "repodoc",
            "prompts",
            "https://example.com/a/b.git",
            "--token",
            "t0k",
            "--header",
            "X-Org: acme",
        ]);
        let Commands::Prompts(args) = cli.command else {
            panic!("expected prompts");
        };
        let credentials = args.source.credentials().unwrap();
        assert_eq!(credentials.bearer_token.as_deref(), Some("t0k"));
        assert_eq!(
            credentials.headers,
            vec![("X-Org".to_string(), "acme".to_string())]
        );
    }
}
