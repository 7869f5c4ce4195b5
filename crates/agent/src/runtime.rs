use std::sync::Arc;

use shopassist_core::{ApplicationError, CatalogStore, MatchingConfig};
use tracing::{debug, info};

use crate::actions::{
    ActionOutcome, ActionRegistry, LastProductDetailsAction, ProductInfoAction, TurnInput,
};
use crate::follow_up::FollowUpResolver;
use crate::resolver::ProductResolver;

/// Per-turn entry point. Holds only read-only state, so one runtime serves any
/// number of conversations concurrently.
pub struct AgentRuntime {
    registry: ActionRegistry,
    catalog_size: usize,
}

impl AgentRuntime {
    pub fn new(store: Arc<CatalogStore>, matching: MatchingConfig) -> Self {
        let mut registry = ActionRegistry::default();
        registry.register(ProductInfoAction::new(ProductResolver::new(
            Arc::clone(&store),
            matching.clone(),
        )));
        registry.register(LastProductDetailsAction::new(FollowUpResolver::new(
            Arc::clone(&store),
            matching,
        )));

        Self { registry, catalog_size: store.len() }
    }

    pub fn handle_turn(
        &self,
        action_name: &str,
        turn: &TurnInput,
        correlation_id: &str,
    ) -> Result<ActionOutcome, ApplicationError> {
        debug!(
            event_name = "agent.turn.received",
            correlation_id,
            action = action_name,
            has_last_product = turn.context.last_product_id.is_some(),
            "handling turn"
        );

        let outcome = self.registry.dispatch(action_name, turn)?;

        info!(
            event_name = "agent.turn.handled",
            correlation_id,
            action = action_name,
            catalog_size = self.catalog_size,
            slot_update = outcome.context_update.is_some(),
            "turn handled"
        );
        Ok(outcome)
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }
}
