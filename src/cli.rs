//! Command-line interface definitions for Headline Relay.
//!
//! Every option can also come from the environment; `main` loads a `.env`
//! file first, so a deployment normally only sets `DISCORD_TOKEN` and
//! `DISCORD_CHANNEL_ID`.

use crate::notify::discord::DISCORD_API_BASE;
use crate::translate::GOOGLE_TRANSLATE_URL;
use clap::Parser;

/// Command-line arguments for the Headline Relay application.
///
/// # Examples
///
/// ```sh
/// # Token and channel from the environment or .env
/// headline_relay
///
/// # One tick against a test channel, then exit
/// headline_relay --channel-id 123456789 --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Discord channel that receives notifications (0 disables sending)
    #[arg(long, env = "DISCORD_CHANNEL_ID", default_value_t = 0)]
    pub channel_id: u64,

    /// Seconds between the end of one poll and the start of the next
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Per-request timeout for outbound HTTP calls, in seconds
    #[arg(
        long,
        env = "HTTP_TIMEOUT_SECS",
        default_value_t = 20,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub http_timeout_secs: u64,

    /// Language government releases are translated into
    #[arg(long, env = "TARGET_LANG", default_value = "zh-CN")]
    pub target_lang: String,

    /// Remember at most this many titles, evicting the oldest (unbounded if unset)
    #[arg(long, env = "DEDUP_CAPACITY")]
    pub dedup_capacity: Option<usize>,

    /// Discord REST API base URL
    #[arg(long, env = "DISCORD_API_BASE", default_value = DISCORD_API_BASE)]
    pub discord_api_base: String,

    /// Translation endpoint (Google `translate_a/single` compatible)
    #[arg(long, env = "TRANSLATE_URL", default_value = GOOGLE_TRANSLATE_URL)]
    pub translate_url: String,

    /// Run a single poll and exit
    #[arg(long)]
    pub once: bool,
}
