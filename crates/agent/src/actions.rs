use std::sync::Arc;

use serde::Serialize;
use shopassist_core::{ApplicationError, ConversationContext, Reply, SlotUpdate};

use crate::follow_up::FollowUpResolver;
use crate::resolver::ProductResolver;

pub const PRODUCT_INFO_ACTION: &str = "action_get_product_info";
pub const LAST_PRODUCT_DETAILS_ACTION: &str = "action_get_last_product_details";

/// What the dialogue manager hands over for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnInput {
    pub utterance: String,
    pub context: ConversationContext,
}

impl TurnInput {
    pub fn new(utterance: impl Into<String>, context: ConversationContext) -> Self {
        Self { utterance: utterance.into(), context }
    }
}

/// Exactly one reply and at most one context write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub reply: Reply,
    pub context_update: Option<SlotUpdate>,
}

impl ActionOutcome {
    pub fn reply_only(reply: Reply) -> Self {
        Self { reply, context_update: None }
    }

    pub fn with_update(reply: Reply, update: SlotUpdate) -> Self {
        Self { reply, context_update: Some(update) }
    }
}

pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, turn: &TurnInput) -> ActionOutcome;
}

pub struct ProductInfoAction {
    resolver: ProductResolver,
}

impl ProductInfoAction {
    pub fn new(resolver: ProductResolver) -> Self {
        Self { resolver }
    }
}

impl Action for ProductInfoAction {
    fn name(&self) -> &'static str {
        PRODUCT_INFO_ACTION
    }

    fn run(&self, turn: &TurnInput) -> ActionOutcome {
        self.resolver.resolve(&turn.utterance)
    }
}

pub struct LastProductDetailsAction {
    resolver: FollowUpResolver,
}

impl LastProductDetailsAction {
    pub fn new(resolver: FollowUpResolver) -> Self {
        Self { resolver }
    }
}

impl Action for LastProductDetailsAction {
    fn name(&self) -> &'static str {
        LAST_PRODUCT_DETAILS_ACTION
    }

    fn run(&self, turn: &TurnInput) -> ActionOutcome {
        self.resolver.resolve(&turn.context)
    }
}

/// Actions by name, kept in registration order.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn register<A>(&mut self, action: A)
    where
        A: Action + 'static,
    {
        let action: Arc<dyn Action> = Arc::new(action);
        match self.actions.iter_mut().find(|existing| existing.name() == action.name()) {
            Some(existing) => *existing = action,
            None => self.actions.push(action),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions.iter().find(|action| action.name() == name)
    }

    pub fn dispatch(
        &self,
        name: &str,
        turn: &TurnInput,
    ) -> Result<ActionOutcome, ApplicationError> {
        let action =
            self.get(name).ok_or_else(|| ApplicationError::UnknownAction(name.to_string()))?;
        Ok(action.run(turn))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|action| action.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
