use std::time::Duration;

use envconfig::Envconfig;
use stream_engine::feed::FeedConfig;
use stream_engine::provider::ProviderKind;

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(from = "STREAM_PROVIDER", default = "http")]
    pub provider: ProviderKind,

    #[envconfig(from = "STREAM_BRIDGE_URL", default = "http://localhost:8081")]
    pub bridge_url: String,

    #[envconfig(from = "PUBLISHER_WALLET")]
    pub publisher_wallet: String,

    #[envconfig(from = "POLL_INTERVAL_MS", default = "3000")]
    pub poll_interval_ms: u64,

    /// Keys to remember before evicting the oldest; unset or 0 never forgets.
    #[envconfig(from = "FEED_SEEN_CAPACITY")]
    pub seen_capacity: Option<usize>,
}

impl Config {
    pub fn feed(&self) -> FeedConfig {
        FeedConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            seen_capacity: self.seen_capacity.filter(|&c| c > 0),
        }
    }
}
