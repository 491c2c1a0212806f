//! On-demand leaderboard queries
//!
//! Each call fetches the publisher's full history and recomputes the
//! snapshot. Nothing is cached between calls, so concurrent queries are
//! independent.

use std::sync::Arc;

use tracing::{debug, error};
use types::errors::ProviderError;
use types::leaderboard::LeaderboardSnapshot;

use crate::decoder::decode_record;
use crate::dedup::BestRecordTable;
use crate::provider::StreamProvider;
use crate::ranker::rank;
use crate::schema::SchemaHandle;

/// Computes leaderboards for one schema.
#[derive(Clone)]
pub struct LeaderboardService {
    provider: Arc<dyn StreamProvider>,
    schema: Arc<SchemaHandle>,
}

impl LeaderboardService {
    pub fn new(provider: Arc<dyn StreamProvider>, schema: Arc<SchemaHandle>) -> Self {
        Self { provider, schema }
    }

    /// Fetch, decode, dedupe and rank everything `publisher` has written.
    pub async fn snapshot(&self, publisher: &str) -> Result<LeaderboardSnapshot, ProviderError> {
        let schema_id = self.schema.schema_id().await?;
        let items = self
            .provider
            .get_all_publisher_data_for_schema(&schema_id, publisher)
            .await
            .map_err(|e| {
                error!(publisher, error = %e, "Leaderboard fetch failed");
                e
            })?;

        let table: BestRecordTable = items.iter().map(|fields| decode_record(fields)).collect();
        let snapshot = rank(&table);

        debug!(
            publisher,
            items = items.len(),
            players = snapshot.total_players,
            "Leaderboard computed"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PLAYER_SCHEMA;
    use crate::provider::InMemoryStreamProvider;
    use serde_json::json;
    use types::field::RawField;

    const PUBLISHER: &str = "0x1111111111111111111111111111111111111111";

    fn fields(player: &str, score: u64, play_time: u64) -> Vec<RawField> {
        vec![
            RawField::new("player", json!(player)),
            RawField::new("score", json!(score)),
            RawField::new("playTime", json!(play_time)),
        ]
    }

    fn setup() -> (Arc<InMemoryStreamProvider>, LeaderboardService) {
        let provider = Arc::new(InMemoryStreamProvider::new(PUBLISHER));
        let schema = Arc::new(SchemaHandle::player(provider.clone()));
        let service = LeaderboardService::new(provider.clone(), schema);
        (provider, service)
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let (_, service) = setup();
        let snapshot = service.snapshot(PUBLISHER).await.unwrap();
        assert_eq!(snapshot, LeaderboardSnapshot::empty());
    }

    #[tokio::test]
    async fn test_best_score_per_player() {
        let (provider, service) = setup();
        let schema_id = InMemoryStreamProvider::schema_id_for(PLAYER_SCHEMA);
        provider.insert_raw(&schema_id, PUBLISHER, fields("0xa", 10, 5));
        provider.insert_raw(&schema_id, PUBLISHER, fields("0xb", 50, 9));
        provider.insert_raw(&schema_id, PUBLISHER, fields("0xa", 70, 6));
        provider.insert_raw(&schema_id, PUBLISHER, vec![RawField::new("score", json!(999))]);

        let snapshot = service.snapshot(PUBLISHER).await.unwrap();
        assert_eq!(snapshot.total_players, 2);
        assert_eq!(snapshot.leaderboard[0].player, "0xa");
        assert_eq!(snapshot.leaderboard[0].score, "70");
        assert_eq!(snapshot.leaderboard[0].play_time, "6");
        assert_eq!(snapshot.leaderboard[1].player, "0xb");
        assert_eq!(snapshot.leaderboard[1].rank, 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let (provider, service) = setup();
        provider.fail_next_fetches(1);
        assert!(matches!(
            service.snapshot(PUBLISHER).await,
            Err(ProviderError::Transport(_))
        ));
    }
}
