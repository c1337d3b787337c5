//! quire: read a headless-CMS blog from the terminal.
//! Every command prints pretty JSON on stdout; logs go to stderr.
#![deny(clippy::all, clippy::pedantic)]

mod commands;
mod print;

use std::sync::Arc;

use quire::application::blog::BlogService;
use quire::application::store::Store;
use quire::config::{self, Command, LoadError};
use quire::infra::cms::CmsClient;
use quire::infra::error::InfraError;
use quire::infra::telemetry;
use thiserror::Error;
use tracing::info;

use commands::Reader;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("{0}")]
    Fetch(String),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let (cli, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let client = CmsClient::new(settings.cms.base_url.clone(), settings.cms.timeout)?;
    let origin = client.origin().clone();
    let service = BlogService::new(Arc::new(client), Arc::new(Store::new()));
    let reader = Reader {
        service,
        origin,
        settings: settings.reader,
    };
    info!(cms = %reader.origin, "quire starting");

    match cli.command {
        Command::Posts(args) => commands::posts(&reader, args).await,
        Command::Post(args) => commands::post(&reader, args).await,
        Command::Author(args) => commands::author(&reader, args).await,
        Command::Categories => commands::categories(&reader).await,
    }
}
