use std::sync::Arc;

use stream_engine::leaderboard::LeaderboardService;
use stream_engine::provider::StreamProvider;
use stream_engine::publish::Publisher;
use stream_engine::schema::SchemaHandle;
use types::errors::CodecError;

#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<SchemaHandle>,
    /// Present only when writes can be signed.
    pub publisher: Option<Arc<Publisher>>,
    pub leaderboard: LeaderboardService,
    /// Account whose data `/data` ranks.
    pub publisher_wallet: Option<String>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn StreamProvider>,
        can_write: bool,
        publisher_wallet: Option<String>,
    ) -> Result<Self, CodecError> {
        let schema = Arc::new(SchemaHandle::player(provider.clone()));
        let publisher = if can_write {
            Some(Arc::new(Publisher::new(provider.clone(), schema.clone())?))
        } else {
            None
        };

        Ok(Self {
            leaderboard: LeaderboardService::new(provider, schema.clone()),
            schema,
            publisher,
            publisher_wallet,
        })
    }
}
