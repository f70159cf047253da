//! `ragline` binary: HTTP server and one-shot CLI for the retrieval
//! pipeline.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use futures_util::{pin_mut, StreamExt};
use ragline_chunker::{Chunker, ChunkerConfig};
use ragline_ingest::{ActiveStore, IngestionPipeline};
use ragline_retrieval::{build_messages, ContextBuilder};
use ragline_vector_store::OpenAiEmbeddings;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

mod chat;
mod http_api;
mod loader;

use chat::ChatClient;
use http_api::AppState;

#[derive(Parser)]
#[command(name = "ragline")]
#[command(about = "Retrieval-augmented chat over your documents", long_about = None)]
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
    /// Start the HTTP API server
    Serve(ServeArgs),

    /// Chunk and embed documents once, printing ingestion stats
    Ingest(IngestArgs),

    /// One-shot: ingest documents, then answer a question over them
    Ask(AskArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    #[command(flatten)]
    chunking: ChunkingArgs,
}

#[derive(Args)]
struct IngestArgs {
    /// A .txt file or a directory of .txt files
    path: PathBuf,

    #[command(flatten)]
    chunking: ChunkingArgs,

    /// Print stats as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct AskArgs {
    /// A .txt file or a directory of .txt files
    path: PathBuf,

    /// The question to answer
    question: String,

    #[command(flatten)]
    chunking: ChunkingArgs,

    /// Base system prompt to augment with retrieved context
    #[arg(long, default_value = "You are a helpful assistant.")]
    system: String,
}

#[derive(Args)]
struct ChunkingArgs {
    /// Chunk window size in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[arg(long, default_value_t = 200)]
    overlap: usize,
}

impl ChunkingArgs {
    fn chunker(&self) -> Result<Chunker> {
        Ok(Chunker::new(ChunkerConfig::new(
            self.chunk_size,
            self.overlap,
        ))?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Ingest(args) => run_ingest(args).await,
        Commands::Ask(args) => run_ask(args).await,
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let provider = Arc::new(OpenAiEmbeddings::from_env()?);
    let state = Arc::new(AppState {
        active: ActiveStore::new(),
        pipeline: IngestionPipeline::new(args.chunking.chunker()?, provider.clone()),
        builder: ContextBuilder::new(provider),
        chat: ChatClient::from_env()?,
    });

    let app = http_api::router(state);
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    println!("Serving chat API on http://{}/api/chat", args.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_ingest(args: IngestArgs) -> Result<()> {
    let documents = loader::load_documents(&args.path).await?;
    let provider = Arc::new(OpenAiEmbeddings::from_env()?);
    let pipeline = IngestionPipeline::new(args.chunking.chunker()?, provider);

    let outcome = pipeline.ingest(&documents).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.stats)?);
    } else {
        eprintln!("Documents: {}", outcome.stats.documents);
        eprintln!("Chunks: {}", outcome.stats.chunks);
        eprintln!("Stored records: {}", outcome.stats.stored_records);
        if outcome.stats.deduplicated() > 0 {
            eprintln!("Duplicate chunks collapsed: {}", outcome.stats.deduplicated());
        }
        if let Some(dimension) = outcome.stats.dimension {
            eprintln!("Vector dimension: {dimension}");
        }
        eprintln!("Elapsed: {}ms", outcome.stats.elapsed_ms);
    }
    Ok(())
}

async fn run_ask(args: AskArgs) -> Result<()> {
    let documents = loader::load_documents(&args.path).await?;
    let provider = Arc::new(OpenAiEmbeddings::from_env()?);
    let pipeline = IngestionPipeline::new(args.chunking.chunker()?, provider.clone());

    let outcome = pipeline.ingest(&documents).await?;
    eprintln!(
        "Indexed {} record(s) from {} document(s)",
        outcome.stats.stored_records, outcome.stats.documents
    );

    let builder = ContextBuilder::new(provider);
    let prompt = builder
        .build_system_message(&args.system, &args.question, &outcome.store)
        .await;
    if let Some(reason) = prompt.fallback_reason() {
        log::warn!("Answering without retrieved context: {reason:?}");
    }

    let messages = build_messages(prompt.into_text(), &[], &args.question);
    let client = ChatClient::from_env()?;

    let stream = client.stream(&messages).await?;
    pin_mut!(stream);
    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await {
        stdout.write_all(fragment?.as_bytes())?;
        stdout.flush()?;
    }
    println!();
    Ok(())
}
