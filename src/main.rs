//! # Headline Relay
//!
//! A polling notifier that watches a crypto news aggregator and a handful of
//! US government economic release pages, and posts every headline it has
//! not announced before to a Discord channel.
//!
//! ## Features
//!
//! - Scrapes the PANews front page (Chinese) and the Federal Reserve, BLS
//!   CPI/PPI and Department of Labor release pages (English)
//! - Remembers announced titles for the lifetime of the process
//! - Translates government releases into the operator's language
//! - Posts one Discord embed per new item through the bot REST API
//!
//! ## Usage
//!
//! ```sh
//! DISCORD_TOKEN=... DISCORD_CHANNEL_ID=... headline_relay
//! ```
//!
//! ## Architecture
//!
//! Every tick runs the same pipeline:
//! 1. **Resolve**: Check that the target channel exists; otherwise skip the tick
//! 2. **Fetch**: Scrape each source into candidate items
//! 3. **Dedup**: Keep titles not seen before, recording them immediately
//! 4. **Translate**: Localize new government releases
//! 5. **Dispatch**: Format and send each item as an embed

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;
mod dedup;
mod error;
mod models;
mod notify;
mod scheduler;
mod scrapers;
#[cfg(test)]
mod testing;
mod translate;
mod utils;

use cli::Cli;
use notify::discord::DiscordSink;
use scheduler::{Scheduler, SchedulerConfig};
use scrapers::HttpFetcher;
use translate::GoogleTranslator;

/// Discord asks bots to identify themselves in this form.
const DISCORD_USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/headline-relay/headline_relay, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env before the filter so RUST_LOG can live there too
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }

    info!("headline_relay starting up");
    let args = Cli::parse();
    debug!(
        channel_id = args.channel_id,
        interval_secs = args.interval_secs,
        target_lang = %args.target_lang,
        "Parsed CLI arguments"
    );

    let timeout = Duration::from_secs(args.http_timeout_secs);
    let scrape_client = scrapers::build_client(timeout)?;
    let discord_client = Client::builder()
        .user_agent(DISCORD_USER_AGENT)
        .timeout(timeout)
        .build()?;

    let sink = DiscordSink::new(discord_client, args.token.clone(), args.channel_id)
        .with_api_base(Url::parse(&args.discord_api_base)?);

    // A rejected token is the one failure that ends the process.
    if sink.has_token() {
        match sink.login().await {
            Ok(user) => info!(username = %user.username, id = %user.id, "Bot is ready"),
            Err(e) => {
                error!(error = %e, "Discord login failed");
                return Err(e.into());
            }
        }
    } else {
        error!("DISCORD_TOKEN is not set; every poll will be skipped");
    }
    if args.channel_id == 0 {
        error!("DISCORD_CHANNEL_ID is not set; every poll will be skipped");
    }

    let config = SchedulerConfig {
        period: Duration::from_secs(args.interval_secs),
        target_lang: args.target_lang.clone(),
        dedup_capacity: args.dedup_capacity,
    };
    if config.dedup_capacity.is_none() {
        debug!("Dedup store is unbounded");
    }

    let translator =
        GoogleTranslator::new(scrape_client.clone()).with_endpoint(Url::parse(&args.translate_url)?);
    let mut scheduler = Scheduler::new(HttpFetcher::new(scrape_client), translator, sink, config);

    if args.once {
        let report = scheduler.tick().await;
        if report.skipped {
            warn!("Single poll was skipped");
        }
        info!(?report, "Single poll finished");
        return Ok(());
    }

    scheduler.run().await;
    Ok(())
}
