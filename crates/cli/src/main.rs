use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use cvmatch_core::{extract_pii, redact, EmbeddingClient};
use cvmatch_index::DocumentIndex;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_OWNER: &str = "local";

#[derive(Parser, Debug)]
#[command(
    name = "cvmatch",
    version = VERSION,
    about = "In-memory resume indexing and semantic matching"
)]
struct Cli {
    /// Override the deterministic embedding dimension
    #[arg(long, global = true)]
    dimensions: Option<usize>,
    /// Opaque owner identifier attached to ingested records
    #[arg(long, global = true, default_value = DEFAULT_OWNER)]
    owner: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank resume chunks against a free-text query
    Ask {
        /// Directory of plain-text resumes to ingest
        #[arg(long)]
        resumes: PathBuf,
        query: String,
        #[arg(short, long, default_value_t = 5)]
        k: usize,
        /// Redact PII in returned snippets
        #[arg(long, action = ArgAction::SetTrue)]
        redact: bool,
    },
    /// Rank resumes against a job's requirement strings
    Match {
        #[arg(long)]
        resumes: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "req", required = true)]
        requirements: Vec<String>,
        #[arg(short = 'n', long, default_value_t = 5)]
        top: usize,
    },
    /// Extract (or redact) PII from a single file
    Pii {
        file: PathBuf,
        #[arg(long, action = ArgAction::SetTrue)]
        redact: bool,
    },
    /// List ingested resumes with pagination
    List {
        #[arg(long)]
        resumes: PathBuf,
        /// Case-insensitive substring filter on the full text
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let embeddings = match cli.dimensions {
        Some(dims) => EmbeddingClient::deterministic(dims),
        None => EmbeddingClient::from_env()?,
    };
    match cli.command {
        Commands::Ask {
            resumes,
            query,
            k,
            redact: redact_output,
        } => {
            let index = DocumentIndex::new(embeddings);
            ingest_dir(&index, &cli.owner, &resumes)?;
            let hits = index.ask(&query, k)?;
            let mut rows = Vec::with_capacity(hits.len());
            for hit in hits {
                let text = if redact_output {
                    let record = index.require_resume(&hit.resume_id)?;
                    redact(&hit.text, &record.pii)
                } else {
                    hit.text
                };
                rows.push(json!({ "resume_id": hit.resume_id, "text": text, "score": hit.score }));
            }
            print_json(&json!(rows))?;
        }
        Commands::Match {
            resumes,
            title,
            description,
            requirements,
            top,
        } => {
            let index = DocumentIndex::new(embeddings);
            ingest_dir(&index, &cli.owner, &resumes)?;
            let job = index.add_job(&cli.owner, &title, &description, requirements);
            let matches = index.match_job(&job.id, top)?;
            print_json(&json!(matches))?;
        }
        Commands::Pii {
            file,
            redact: redact_output,
        } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let pii = extract_pii(&text);
            if redact_output {
                println!("{}", redact(&text, &pii));
            } else {
                print_json(&json!(pii))?;
            }
        }
        Commands::List {
            resumes,
            query,
            limit,
            offset,
        } => {
            let index = DocumentIndex::new(embeddings);
            ingest_dir(&index, &cli.owner, &resumes)?;
            let page = index.list_resumes(&cli.owner, query.as_deref(), limit, offset);
            let items: Vec<serde_json::Value> = page
                .items
                .iter()
                .map(|record| {
                    json!({
                        "id": record.id,
                        "filename": record.filename,
                        "mime": record.mime,
                        "chunks": record.chunks.len(),
                        "created_at_ms": record.created_at_ms,
                    })
                })
                .collect();
            print_json(&json!({ "total": page.total, "items": items }))?;
        }
    }
    Ok(())
}

/// Ingests every `*.txt` file under `dir` in path order, so resume ids are
/// stable across runs over the same tree.
fn ingest_dir(index: &DocumentIndex, owner: &str, dir: &Path) -> Result<usize> {
    let mut count = 0usize;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("resume.txt")
            .to_string();
        index.add_resume(owner, &filename, "text/plain", &text)?;
        count += 1;
    }
    tracing::info!(count, dir = %dir.display(), "resumes ingested");
    Ok(count)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
