use envconfig::Envconfig;
use stream_engine::provider::ProviderKind;

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "BIND_PORT", default = "8080")]
    pub port: u16,

    #[envconfig(from = "STREAM_PROVIDER", default = "http")]
    pub provider: ProviderKind,

    #[envconfig(from = "STREAM_BRIDGE_URL", default = "http://localhost:8081")]
    pub bridge_url: String,

    /// Signing credential; without it publishing is disabled.
    #[envconfig(from = "PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Account whose data the leaderboard reads; without it reads are disabled.
    #[envconfig(from = "PUBLISHER_WALLET")]
    pub publisher_wallet: Option<String>,
}

impl Config {
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
