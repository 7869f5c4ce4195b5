//! Reply texts shared by the handlers.

use shopassist_core::{CatalogStore, MatchingConfig, ProductRecord, Reply};

pub const EMPTY_UTTERANCE_PROMPT: &str = "Could you tell me what you're looking for?";
pub const NOT_FOUND_MESSAGE: &str = "I couldn't find that product. Try asking about a specific \
     model name like 'iPhone 11' or 'Dell Vostro laptop'.";
pub const NOTHING_AVAILABLE_MESSAGE: &str = "No, I don't have that type of product right now.";
pub const UNKNOWN_LAST_PRODUCT_PROMPT: &str =
    "I'm not sure which product you mean. Could you ask again?";

const BULLET: &str = "\n• ";

/// Name, price and category of `product`, followed by up to
/// `max_recommendations` "frequently bought together" items.
///
/// The recommendation list is cut to length first and ids missing from the
/// catalog are dropped afterwards, so fewer items than the cap can show even
/// when later entries would resolve. With nothing left the section is omitted.
pub fn product_details(
    store: &CatalogStore,
    product: &ProductRecord,
    matching: &MatchingConfig,
) -> Reply {
    let mut text = format!(
        "*{}*\n💰 ${} • {}",
        product.name,
        product.display_price(),
        product.category_or(&matching.default_category)
    );

    let related = store
        .recommendations(&product.id)
        .iter()
        .take(matching.max_recommendations)
        .filter_map(|product_id| store.product(product_id))
        .map(|related| format!("{} (${})", related.name, related.display_price()))
        .collect::<Vec<_>>();

    if !related.is_empty() {
        text.push_str("\n\n🔍 *Frequently bought together:*");
        text.push_str(BULLET);
        text.push_str(&related.join(BULLET));
    }

    Reply::markdown(text)
}

pub fn availability_list(plural: &str, names: &[&str]) -> Reply {
    if names.is_empty() {
        return Reply::plain(NOTHING_AVAILABLE_MESSAGE);
    }

    Reply::plain(format!(
        "Yes, I have these {plural} available:{BULLET}{}\n\nAsk me about a specific one to see details.",
        names.join(BULLET)
    ))
}
