//! `contacts`: query a contacts API from the terminal.
//!
//! ```bash
//! contacts ann --sort email --order desc
//! CONTACTS_API_BASE_URL=https://crm.example.com contacts --page 2 --json
//! ```

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use contacts_client::{fetch_contacts, render, telemetry, ReqwestTransport};
use contacts_core::{
    config::{BASE_URL_ENV, ENDPOINTS_ENV},
    ClientConfig, ContactsClient, FetchError, ListingState, SortOrder, DEFAULT_BASE_URL,
    DEFAULT_PAGE_SIZE,
};
use tokio_util::sync::CancellationToken;

/// Search, sort and page through a contacts API.
///
/// Candidate endpoints are tried in order until one answers with JSON.
#[derive(Parser)]
#[command(name = "contacts", version)]
struct Cli {
    /// Free-text search across name, email, phone and address.
    #[arg(default_value = "")]
    query: String,

    /// API base URL.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Candidate endpoint path, tried in the order given. Defaults to the
    /// four common contacts paths.
    #[arg(long = "endpoint", env = ENDPOINTS_ENV, value_delimiter = ',')]
    endpoints: Vec<String>,

    /// Column to sort by.
    #[arg(long, default_value = "name")]
    sort: String,

    /// Sort direction: asc or desc.
    #[arg(long, default_value = "asc")]
    order: SortOrder,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Per-request timeout in seconds. Unset means the transport default.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the page as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    telemetry::init_tracing("warn");
    let cli = Cli::parse();

    let mut config = ClientConfig::with_base_url(cli.base_url);
    if !cli.endpoints.is_empty() {
        config.endpoints = cli.endpoints;
    }
    config.default_page_size = cli.page_size;
    config.validate().context("invalid client configuration")?;

    let client = ContactsClient::new(config);
    let transport = ReqwestTransport::with_timeout(cli.timeout_secs.map(Duration::from_secs))
        .context("failed to build HTTP client")?;

    let mut listing = ListingState::new(cli.page_size);
    listing.q = cli.query;
    listing.sort = cli.sort;
    listing.order = cli.order;
    listing.page = cli.page.max(1);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    listing.begin_load();
    match fetch_contacts(&client, &transport, listing.to_query(), &cancel).await {
        Ok(page) => listing.apply_page(&page),
        Err(FetchError::Cancelled) => return Ok(ExitCode::from(130)),
        Err(err) => listing.apply_error(&err),
    }

    if cli.json {
        if let Some(error) = &listing.error {
            anyhow::bail!("{error}");
        }
        println!("{}", render::render_json(&listing)?);
        return Ok(ExitCode::SUCCESS);
    }

    print!("{}", render::render_table(&listing, client.base_url()));
    if listing.error.is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
