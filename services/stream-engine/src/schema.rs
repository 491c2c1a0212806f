//! Schema handle and startup lifecycle
//!
//! The schema id is a pure function of the schema text, so it is computed
//! once and cached for the life of the handle. Concurrent first callers may
//! race to compute it; the result is identical either way.
//!
//! Registration runs once at startup:
//!
//! ```text
//! Uninitialized ─► Computed ─┬─► Registered ────────┬─► Ready
//!                            ├─► AlreadyRegistered ─┤
//!                            └─► RegistrationWarned ┘
//! ```
//!
//! A failed registration never blocks readiness: read paths only need the id.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use types::errors::ProviderError;
use types::ids::{SchemaId, TxHash};

use crate::provider::{SchemaDefinition, StreamProvider};

/// Lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Uninitialized,
    Computed,
    Registered,
    AlreadyRegistered,
    RegistrationWarned,
    Ready,
}

/// What registration amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Submitted and confirmed.
    Registered(TxHash),
    /// Nothing to do; the provider already knows the schema.
    AlreadyRegistered,
    /// Registration failed; the id is still usable for reads.
    Warned(String),
}

/// Shared access to one schema's id.
pub struct SchemaHandle {
    provider: Arc<dyn StreamProvider>,
    definition: SchemaDefinition,
    id: OnceCell<SchemaId>,
}

impl SchemaHandle {
    pub fn new(provider: Arc<dyn StreamProvider>, definition: SchemaDefinition) -> Self {
        Self {
            provider,
            definition,
            id: OnceCell::new(),
        }
    }

    /// Handle for the player score schema.
    pub fn player(provider: Arc<dyn StreamProvider>) -> Self {
        Self::new(provider, SchemaDefinition::player())
    }

    pub fn definition(&self) -> &SchemaDefinition {
        &self.definition
    }

    /// The id if it has already been computed.
    pub fn cached(&self) -> Option<&SchemaId> {
        self.id.get()
    }

    /// The schema id, computing it on first use.
    pub async fn schema_id(&self) -> Result<SchemaId, ProviderError> {
        self.id
            .get_or_try_init(|| self.provider.compute_schema_id(&self.definition.schema))
            .await
            .cloned()
    }

    /// Submit the schema for registration, treating "already exists" as success.
    pub async fn register(&self) -> RegistrationOutcome {
        let submitted = self
            .provider
            .register_data_schemas(std::slice::from_ref(&self.definition), true)
            .await;

        match submitted {
            Ok(Some(tx)) if tx.is_transaction() => {
                match self.provider.wait_for_confirmation(&tx).await {
                    Ok(()) => {
                        info!(tx = %tx, schema = %self.definition.id, "Schema registered");
                        RegistrationOutcome::Registered(tx)
                    }
                    Err(err) => {
                        warn!(tx = %tx, error = %err, "Schema registration was not confirmed");
                        RegistrationOutcome::Warned(err.to_string())
                    }
                }
            }
            Ok(_) => {
                info!(schema = %self.definition.id, "Schema already registered, no action required");
                RegistrationOutcome::AlreadyRegistered
            }
            Err(err) if err.is_already_registered() => {
                info!(schema = %self.definition.id, "Schema already exists, ready to use");
                RegistrationOutcome::AlreadyRegistered
            }
            Err(err) => {
                warn!(schema = %self.definition.id, error = %err, "Schema registration warning");
                RegistrationOutcome::Warned(err.to_string())
            }
        }
    }
}

/// Drives a handle through the startup states.
pub struct SchemaLifecycle {
    handle: Arc<SchemaHandle>,
    state: SchemaState,
    history: Vec<SchemaState>,
}

impl SchemaLifecycle {
    pub fn new(handle: Arc<SchemaHandle>) -> Self {
        Self {
            handle,
            state: SchemaState::Uninitialized,
            history: vec![SchemaState::Uninitialized],
        }
    }

    pub fn state(&self) -> SchemaState {
        self.state
    }

    /// Every state visited, in order.
    pub fn history(&self) -> &[SchemaState] {
        &self.history
    }

    fn transition(&mut self, next: SchemaState) {
        self.state = next;
        self.history.push(next);
    }

    /// Compute the id, register, and become ready.
    ///
    /// Only a failure to compute the id is returned as an error; the state then
    /// stays `Uninitialized` and readers compute the id lazily.
    pub async fn initialize(&mut self) -> Result<RegistrationOutcome, ProviderError> {
        let schema_id = match self.handle.schema_id().await {
            Ok(id) => id,
            Err(err) => {
                error!(error = %err, "Failed to initialize schema");
                return Err(err);
            }
        };
        info!(schema_id = %schema_id, "Schema id computed");
        self.transition(SchemaState::Computed);

        let outcome = self.handle.register().await;
        self.transition(match outcome {
            RegistrationOutcome::Registered(_) => SchemaState::Registered,
            RegistrationOutcome::AlreadyRegistered => SchemaState::AlreadyRegistered,
            RegistrationOutcome::Warned(_) => SchemaState::RegistrationWarned,
        });
        self.transition(SchemaState::Ready);

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PLAYER_SCHEMA;
    use crate::provider::InMemoryStreamProvider;

    const PUBLISHER: &str = "0x1111111111111111111111111111111111111111";

    fn setup() -> (Arc<InMemoryStreamProvider>, Arc<SchemaHandle>) {
        let provider = Arc::new(InMemoryStreamProvider::new(PUBLISHER));
        let handle = Arc::new(SchemaHandle::player(provider.clone()));
        (provider, handle)
    }

    #[tokio::test]
    async fn test_schema_id_cached() {
        let (_, handle) = setup();
        assert!(handle.cached().is_none());

        let id = handle.schema_id().await.unwrap();
        assert_eq!(handle.cached(), Some(&id));
        assert_eq!(id, InMemoryStreamProvider::schema_id_for(PLAYER_SCHEMA));
    }

    #[tokio::test]
    async fn test_first_initialize_registers() {
        let (provider, handle) = setup();
        let mut lifecycle = SchemaLifecycle::new(handle.clone());

        let outcome = lifecycle.initialize().await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Registered(_)));
        assert_eq!(
            lifecycle.history(),
            &[
                SchemaState::Uninitialized,
                SchemaState::Computed,
                SchemaState::Registered,
                SchemaState::Ready
            ]
        );
        assert!(provider.is_registered(handle.cached().unwrap()));
    }

    #[tokio::test]
    async fn test_second_registration_is_noop() {
        let (_, handle) = setup();
        SchemaLifecycle::new(handle.clone()).initialize().await.unwrap();

        let mut again = SchemaLifecycle::new(handle);
        let outcome = again.initialize().await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(again.state(), SchemaState::Ready);
    }

    #[tokio::test]
    async fn test_already_exists_error_downgraded() {
        let (provider, handle) = setup();
        provider.reject_registrations(Some("Nothing to register"));

        let outcome = handle.register().await;
        assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
    }

    #[tokio::test]
    async fn test_other_failure_still_ready() {
        let (provider, handle) = setup();
        provider.reject_registrations(Some("insufficient funds"));

        let mut lifecycle = SchemaLifecycle::new(handle.clone());
        let outcome = lifecycle.initialize().await.unwrap();
        assert_eq!(
            outcome,
            RegistrationOutcome::Warned("insufficient funds".to_string())
        );
        assert_eq!(lifecycle.state(), SchemaState::Ready);
        assert!(lifecycle.history().contains(&SchemaState::RegistrationWarned));
        assert!(handle.cached().is_some());
    }
}
