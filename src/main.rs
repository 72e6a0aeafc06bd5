use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use jdk_index::config;
use jdk_index::github::client::GitHubClient;
use jdk_index::github::transport::{HttpFetcher, HttpTransport, ReqwestFetcher};
use jdk_index::persistence::JsonFilePersistence;
use jdk_index::store::ApiDataStore;
use jdk_index::updater::{AdoptReposBuilder, GitHubReleaseSource, Updater};

#[derive(Parser)]
#[command(name = "jdk-index")]
#[command(version, about = "Aggregates release metadata for the AdoptOpenJDK build repositories")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single full update and exit
    Update,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(Command::Update) => runtime.block_on(run_once()),
        None => runtime.block_on(run_daemon()),
    }
}

async fn run_once() -> anyhow::Result<()> {
    let (updater, _store) = build_updater(Arc::new(ApiDataStore::empty()))?;
    updater.run_full_update().await?;
    Ok(())
}

async fn run_daemon() -> anyhow::Result<()> {
    let persistence = JsonFilePersistence::new(config::releases_dir());
    let store = Arc::new(ApiDataStore::load(&persistence, config::DEFAULT_VERSIONS).await);

    let (updater, _store) = build_updater(Arc::clone(&store))?;
    updater.run().await;
    Ok(())
}

fn build_updater(store: Arc<ApiDataStore>) -> anyhow::Result<(Updater, Arc<ApiDataStore>)> {
    let token = config::github_token()
        .context("no GitHub token found; set GITHUB_TOKEN or write ~/.github_token")?;

    let transport = Arc::new(HttpTransport::new(token));
    let client = GitHubClient::new(transport);
    let fetcher: Arc<dyn HttpFetcher> = Arc::new(ReqwestFetcher::new());
    let source = Arc::new(GitHubReleaseSource::new(client, fetcher));

    let builder = AdoptReposBuilder::new(source);
    let persistence = Arc::new(JsonFilePersistence::new(config::releases_dir()));
    let updater = Updater::new(
        builder,
        Arc::clone(&store),
        persistence,
        config::DEFAULT_VERSIONS.to_vec(),
    );

    Ok((updater, store))
}
