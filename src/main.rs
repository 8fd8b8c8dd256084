mod config;
mod kb;
mod session;
mod translator;

pub const USER_AGENT: &str = concat!("parley/", env!("CARGO_PKG_VERSION"));

use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::info;

use config::Credentials;
use kb::KnowledgeBaseClient;
use translator::TranslatorClient;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(version, about = "Console knowledge-base Q&A with automatic answer translation")]
struct Cli {
    /// Knowledge base project to query.
    #[arg(long, default_value = "CatWiki")]
    project: String,

    /// Deployment slot of the knowledge base project.
    #[arg(long, default_value = "production")]
    deployment: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("parley=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout().lock();

    let credentials = Credentials::resolve(&mut input, &mut out)?;

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .build()?;

    let kb = KnowledgeBaseClient::new(http.clone(), &credentials, &cli.project, &cli.deployment);
    let translator = TranslatorClient::new(http, &credentials);

    info!(project = %cli.project, deployment = %cli.deployment, "starting session");
    session::run(&mut input, &mut out, &kb, &translator).await?;
    Ok(())
}
