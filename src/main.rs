//! mcpforge CLI entrypoint
//! Parses command-line arguments and dispatches to the import pipeline,
//! generators, and simulated deployment.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use mcpforge::application::{
    DeployServerRequest, DeployServerUseCase, FileSystemOutputService, GenerateServerRequest,
    GenerateServerUseCase, ImportDefinitionRequest, ImportDefinitionUseCase,
};
use mcpforge::generation::generate_server_code;
use mcpforge::ingest::{
    CompositeDefinitionLoader, DefinitionLoader, classify, detect, extract, parse, validate,
};
use mcpforge::model::config::ServerConfig;
use mcpforge::store::{DeploymentStatus, ServerConfigRecord, ServerConfigStore, SqliteStore};

#[derive(Parser)]
#[command(name = "mcpforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the record store database (defaults to the user data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Inspect an API definition without saving anything
    Inspect {
        /// Path or URL of the definition
        source: String,
    },
    /// Import an API definition into a project
    Import {
        /// Path or URL of the definition
        source: String,
        /// Project the definition belongs to
        #[arg(long, default_value = "default")]
        project: String,
        /// Display name (defaults to the source filename)
        #[arg(long)]
        name: Option<String>,
    },
    /// Generate an MCP server from a configuration file
    Generate {
        /// Path to a server configuration JSON file
        #[arg(long)]
        config: PathBuf,
        /// Project the configuration belongs to
        #[arg(long, default_value = "default")]
        project: String,
        /// Output directory for the generated server
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// Run a simulated deployment for a configuration file
    Deploy {
        /// Path to a server configuration JSON file
        #[arg(long)]
        config: PathBuf,
        /// Project the configuration belongs to
        #[arg(long, default_value = "default")]
        project: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Inspect { source } => run_inspect(source).await?,
        Commands::Import {
            source,
            project,
            name,
        } => run_import(&cli, source, project, name.clone()).await?,
        Commands::Generate {
            config,
            project,
            output_dir,
        } => run_generate(&cli, config, project, output_dir).await?,
        Commands::Deploy { config, project } => run_deploy(&cli, config, project).await?,
    }
    Ok(())
}

/// Resolves the store database path, defaulting under the user data
/// directory.
fn store_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.store {
        return Ok(path.clone());
    }
    let base =
        dirs::data_dir().context("could not determine a data directory for the record store")?;
    Ok(base.join("mcpforge").join("mcpforge.db"))
}

async fn open_store(cli: &Cli) -> anyhow::Result<Arc<SqliteStore>> {
    let path = store_path(cli)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create store directory {}", parent.display()))?;
    }
    let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open record store at {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Reads a server configuration from a JSON file.
async fn read_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid server configuration in {}", path.display()))
}

/// Runs the pipeline over a definition and prints what it found, saving
/// nothing.
async fn run_inspect(source: &str) -> anyhow::Result<()> {
    let loader = CompositeDefinitionLoader::new();
    let loaded = loader
        .load(source)
        .await
        .context("failed to load definition")?;

    let detected = detect(&loaded.content, loaded.filename.as_deref());
    let parsed = parse(&loaded.content, detected).context("failed to parse definition")?;
    let classification = classify(&parsed);
    let problems = validate(&parsed, classification.format);
    let endpoints = extract(&parsed, classification.format);

    println!(
        "Format: {} (detected syntax: {detected})",
        classification.format.display_name()
    );
    if classification.is_fallback() {
        println!("        no dialect marker matched; OpenAPI 3 assumed");
    }

    if problems.is_empty() {
        println!("Valid:  yes");
    } else {
        println!("Valid:  no");
        for problem in &problems {
            println!("  ✗ {problem}");
        }
    }

    if endpoints.is_empty() {
        println!("Endpoints: none found");
    } else {
        println!("Endpoints ({}):", endpoints.len());
        for endpoint in &endpoints {
            println!(
                "  {:7} {:<32} [{}] {}",
                endpoint.method.as_str(),
                endpoint.path,
                endpoint.mcp_type,
                endpoint.description
            );
        }
    }
    Ok(())
}

/// Imports a definition into the record store.
async fn run_import(
    cli: &Cli,
    source: &str,
    project: &str,
    name: Option<String>,
) -> anyhow::Result<()> {
    let store = open_store(cli).await?;
    let use_case =
        ImportDefinitionUseCase::new(Arc::new(CompositeDefinitionLoader::new()), store);

    let response = use_case
        .execute(ImportDefinitionRequest {
            project_id: project.to_string(),
            name,
            source: source.to_string(),
        })
        .await
        .context("import failed")?;

    if !response.is_valid() {
        error!("definition failed validation; nothing saved");
        for message in &response.validation {
            println!("  ✗ {message}");
        }
        anyhow::bail!(
            "definition failed validation with {} problem(s)",
            response.validation.len()
        );
    }

    let record = response
        .record
        .context("valid import always carries a record")?;
    println!(
        "✅ Imported {} as {} ({} endpoint(s))",
        record.name,
        record.id,
        response.endpoints.len()
    );
    Ok(())
}

/// Generates a server and writes it under the output directory.
async fn run_generate(
    cli: &Cli,
    config_path: &Path,
    project: &str,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let config = read_config(config_path).await?;
    info!(name = %config.name, language = %config.language, "generating server");

    let store = open_store(cli).await?;
    let use_case = GenerateServerUseCase::new(store, Arc::new(FileSystemOutputService::new()));

    let response = use_case
        .execute(GenerateServerRequest {
            project_id: project.to_string(),
            config,
            output_dir: output_dir.to_path_buf(),
        })
        .await?;

    println!(
        "✅ Generated {} file(s) in {} (configuration {})",
        response.files_written,
        response.output_path.display(),
        response.configuration_id
    );
    Ok(())
}

/// Regenerates the server in memory and runs the simulated deployment,
/// recording the outcome.
async fn run_deploy(cli: &Cli, config_path: &Path, project: &str) -> anyhow::Result<()> {
    let config = read_config(config_path).await?;
    let store = open_store(cli).await?;

    let result = generate_server_code(&config);
    if !result.success {
        anyhow::bail!(
            "generation failed: {}",
            result
                .error
                .unwrap_or_else(|| "no error message".to_string())
        );
    }
    let files = result.files.unwrap_or_default();

    // The deployment record hangs off a configuration snapshot.
    let snapshot = ServerConfigRecord::new(project.to_string(), config.clone());
    ServerConfigStore::create(store.as_ref(), &snapshot)
        .await
        .context("failed to snapshot configuration")?;

    let use_case = DeployServerUseCase::new(store);
    let record = use_case
        .execute(DeployServerRequest {
            configuration_id: snapshot.id.clone(),
            config,
            files,
        })
        .await?;

    match record.status {
        DeploymentStatus::Success => {
            let url = record.url.as_deref().unwrap_or("unknown");
            println!("✅ Deployed: {url}");
        }
        _ => {
            error!(id = %record.id, "deployment failed");
            for line in &record.log {
                println!("  {line}");
            }
            anyhow::bail!("deployment ended in status {}", record.status);
        }
    }
    Ok(())
}
