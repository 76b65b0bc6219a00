use sage::cli::output::Output;
use sage::cli::{Cli, Commands};
use sage::types::Chunk;
use sage::{GeminiEmbedder, ModelTier, QueryEngine, SageConfig};
use sage_vector::VectorIndex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    let filter = if cli.verbose {
        EnvFilter::new("sage=debug,sage_vector=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sage=warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> sage::Result<()> {
    let config = SageConfig::load(&cli.config)?;

    match cli.command {
        Commands::Ingest => {
            let api_key = config.api.api_key()?;
            let embedder = GeminiEmbedder::new(
                config.api.api_base.clone(),
                api_key,
                config.models.embedding_model.clone(),
            );

            output.info(&format!(
                "Ingesting corpus from {}",
                config.paths.essays.display()
            ));
            let (report, _) = sage::ingest::run(&config, &embedder).await?;

            output.success("Ingestion complete");
            output.kv("documents", &report.documents.to_string());
            output.kv("chunks", &report.chunks.to_string());
            output.kv("dimensions", &report.dimensions.to_string());
            output.kv("index", &config.paths.index.display().to_string());
        }

        Commands::Query { question, fast } => {
            let tier = ModelTier::from_fast_flag(fast);
            let index_path = config.paths.index.clone();
            let top_k = config.retrieval.top_k;

            let engine = QueryEngine::from_config(config, tier)?;
            engine.load_index(&index_path)?;

            let result = engine.query(&question).await?;

            output.header("Answer");
            output.body(&result.answer);

            output.header("Sources");
            if result.sources.is_empty() {
                output.warning("No chunks met the similarity threshold");
            } else {
                for source in &result.sources {
                    output.list_item(&format!("{} ({})", source.title, source.url));
                }
            }

            output.header("Confidence");
            output.kv("score", &format!("{:.1} / 100", result.confidence));
            output.kv("top_k", &top_k.to_string());

            if cli.verbose {
                output.header("Reasoning");
                for step in &result.reasoning_steps {
                    output.list_item(step);
                }
            }
            output.newline();
        }

        Commands::Info => {
            output.header("Configuration");
            output.kv("config", &cli.config.display().to_string());
            output.kv("essays", &config.paths.essays.display().to_string());
            output.kv("index", &config.paths.index.display().to_string());
            output.kv("embedding_model", &config.models.embedding_model);
            output.kv("quality_model", &config.models.quality_model);
            output.kv("fast_model", &config.models.fast_model);
            output.kv("chunk_size", &config.chunking.chunk_size.to_string());
            output.kv("chunk_overlap", &config.chunking.chunk_overlap.to_string());
            output.kv("top_k", &config.retrieval.top_k.to_string());
            output.kv(
                "similarity_threshold",
                &config.retrieval.similarity_threshold.to_string(),
            );

            output.header("Index");
            match VectorIndex::<Chunk>::load(&config.paths.index) {
                Ok(index) => {
                    output.kv("chunks", &index.len().to_string());
                    output.kv("dimensions", &index.dimensions().to_string());
                }
                Err(e) => {
                    output.warning(&format!("Not available: {}", e));
                    output.hint("Run 'sage ingest' to build the index");
                }
            }
            output.newline();
        }
    }

    Ok(())
}
