use std::sync::Arc;

use shopassist_core::{CatalogStore, ConversationContext, MatchingConfig, Reply};

use crate::actions::ActionOutcome;
use crate::reply::{self, UNKNOWN_LAST_PRODUCT_PROMPT};

/// Answers "tell me more about it" style turns from the remembered product.
/// Reads the context, never writes it.
pub struct FollowUpResolver {
    store: Arc<CatalogStore>,
    matching: MatchingConfig,
}

impl FollowUpResolver {
    pub fn new(store: Arc<CatalogStore>, matching: MatchingConfig) -> Self {
        Self { store, matching }
    }

    pub fn resolve(&self, context: &ConversationContext) -> ActionOutcome {
        let product = context.last_product_id.as_ref().and_then(|id| self.store.product(id));
        let reply = match product {
            Some(product) => reply::product_details(&self.store, product, &self.matching),
            None => Reply::plain(UNKNOWN_LAST_PRODUCT_PROMPT),
        };
        ActionOutcome::reply_only(reply)
    }
}
