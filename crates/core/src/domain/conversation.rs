use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::product::ProductId;

pub const LAST_PRODUCT_SLOT: &str = "last_product_id";

/// Per-conversation state owned by the dialogue manager.
///
/// Handlers only ever see a snapshot of it; writes go back out as a
/// [`SlotUpdate`] that the dialogue manager applies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub last_product_id: Option<ProductId>,
}

impl ConversationContext {
    pub fn with_last_product(product_id: impl Into<ProductId>) -> Self {
        Self { last_product_id: Some(product_id.into()) }
    }

    /// Reads the context out of a raw slot map. Non-string or blank values
    /// count as unset.
    pub fn from_slots(slots: &BTreeMap<String, Value>) -> Self {
        let last_product_id = slots
            .get(LAST_PRODUCT_SLOT)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ProductId::from);
        Self { last_product_id }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotUpdate {
    LastProduct(ProductId),
}

impl SlotUpdate {
    pub fn slot_name(&self) -> &'static str {
        match self {
            Self::LastProduct(_) => LAST_PRODUCT_SLOT,
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Self::LastProduct(product_id) => Value::String(product_id.0.clone()),
        }
    }

    pub fn apply(&self, context: &mut ConversationContext) {
        match self {
            Self::LastProduct(product_id) => context.last_product_id = Some(product_id.clone()),
        }
    }
}
