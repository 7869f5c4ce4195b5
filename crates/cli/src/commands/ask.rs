use std::sync::Arc;

use serde::Serialize;
use shopassist_agent::{AgentRuntime, TurnInput, PRODUCT_INFO_ACTION};
use shopassist_core::config::{AppConfig, LoadOptions};
use shopassist_core::{
    CatalogHealth, CatalogStore, ConversationContext, ProductId, Reply, SlotUpdate,
};

use super::CommandResult;

pub const DEFAULT_ACTION: &str = PRODUCT_INFO_ACTION;

#[derive(Clone, Debug)]
pub struct AskRequest {
    pub utterance: String,
    pub last_product: Option<String>,
    pub action: String,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct AskOutput<'a> {
    action: &'a str,
    reply: Reply,
    context_update: Option<SlotUpdate>,
    catalog: CatalogHealth,
}

pub fn run(request: &AskRequest) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("ask", "config_validation", error.to_string(), 2)
        }
    };

    let loaded = CatalogStore::load_or_degraded(&config.catalog.artifact_path);
    let runtime = AgentRuntime::new(Arc::new(loaded.store), config.matching);

    let context = match request.last_product.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => ConversationContext::with_last_product(ProductId::from(id)),
        _ => ConversationContext::default(),
    };
    let turn = TurnInput::new(request.utterance.clone(), context);

    let outcome = match runtime.handle_turn(&request.action, &turn, "cli") {
        Ok(outcome) => outcome,
        Err(error) => {
            return CommandResult::failure("ask", "unknown_action", error.to_string(), 3)
        }
    };

    if !request.json {
        let mut output = outcome.reply.text;
        if let Some(update) = outcome.context_update {
            output.push_str(&format!("\n\n[{} = {}]", update.slot_name(), update.value()));
        }
        return CommandResult { exit_code: 0, output };
    }

    let payload = AskOutput {
        action: &request.action,
        reply: outcome.reply,
        context_update: outcome.context_update,
        catalog: loaded.health,
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("ask", "serialization", error.to_string(), 1),
    }
}
