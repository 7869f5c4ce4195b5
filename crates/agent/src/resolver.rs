//! Keyword-overlap product matching for free-text shopper questions.

use std::sync::Arc;

use shopassist_core::{CatalogStore, MatchingConfig, ProductRecord, Reply, SlotUpdate, TypeHints};

use crate::actions::ActionOutcome;
use crate::reply::{self, EMPTY_UTTERANCE_PROMPT, NOT_FOUND_MESSAGE};

/// Scoring pass over the catalog for one utterance.
#[derive(Debug)]
pub struct MatchResult<'a> {
    pub hints: TypeHints<'a>,
    /// Highest-scoring entry; the earliest one wins a tie.
    pub best: Option<ScoredProduct<'a>>,
    /// Every entry with a positive score, in catalog order.
    pub candidates: Vec<&'a ProductRecord>,
}

#[derive(Clone, Copy, Debug)]
pub struct ScoredProduct<'a> {
    pub product: &'a ProductRecord,
    pub score: usize,
}

pub struct ProductResolver {
    store: Arc<CatalogStore>,
    matching: MatchingConfig,
}

impl ProductResolver {
    pub fn new(store: Arc<CatalogStore>, matching: MatchingConfig) -> Self {
        Self { store, matching }
    }

    pub fn resolve(&self, utterance: &str) -> ActionOutcome {
        let utterance = normalize_utterance(utterance);
        if utterance.is_empty() {
            return ActionOutcome::reply_only(Reply::plain(EMPTY_UTTERANCE_PROMPT));
        }

        let result = self.match_products(&utterance);

        if is_availability_question(&utterance) {
            if let Some(primary) = result.hints.primary() {
                let names = result
                    .candidates
                    .iter()
                    .take(self.matching.max_listed)
                    .map(|product| product.name.as_str())
                    .collect::<Vec<_>>();
                return ActionOutcome::reply_only(reply::availability_list(&primary.plural, &names));
            }
        }

        let Some(best) = result.best else {
            return ActionOutcome::reply_only(Reply::plain(NOT_FOUND_MESSAGE));
        };

        let details = reply::product_details(&self.store, best.product, &self.matching);
        ActionOutcome::with_update(details, SlotUpdate::LastProduct(best.product.id.clone()))
    }

    /// Expects an already normalized (trimmed, lowercase) utterance.
    pub fn match_products<'a>(&'a self, utterance: &str) -> MatchResult<'a> {
        let hints = TypeHints::detect(&self.matching.vocabulary, utterance);
        let mut best: Option<ScoredProduct<'a>> = None;
        let mut candidates = Vec::new();

        for product in self.store.products() {
            if !hints.admits(&product.name) {
                continue;
            }

            let score = product.keyword_score(utterance);
            if score == 0 {
                continue;
            }

            candidates.push(product);
            if best.map_or(true, |current| score > current.score) {
                best = Some(ScoredProduct { product, score });
            }
        }

        MatchResult { hints, best, candidates }
    }
}

pub fn normalize_utterance(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// "do you have ...", "have ...?" or "... available?" phrasing. Only treated as
/// a listing request when a type hint is also active.
pub fn is_availability_question(utterance: &str) -> bool {
    utterance.contains("do you have")
        || utterance.starts_with("have ")
        || utterance.ends_with(" available?")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use shopassist_core::{
        CatalogStore, MatchingConfig, ProductId, ProductRecord, ReplyFormat, SlotUpdate,
    };

    use super::{is_availability_question, normalize_utterance, ProductResolver};
    use crate::reply::{EMPTY_UTTERANCE_PROMPT, NOTHING_AVAILABLE_MESSAGE, NOT_FOUND_MESSAGE};

    fn product(id: &str, name: &str, price: i64, keywords: &str) -> ProductRecord {
        ProductRecord::new(id, name, Decimal::new(price, 0), None, keywords)
    }

    fn resolver(products: Vec<ProductRecord>, recommender: &[(&str, &[&str])]) -> ProductResolver {
        let recommender = recommender
            .iter()
            .map(|(id, related)| {
                (ProductId::from(*id), related.iter().map(|r| ProductId::from(*r)).collect())
            })
            .collect::<HashMap<_, _>>();
        let store = CatalogStore::from_parts(products, recommender, HashMap::new());
        ProductResolver::new(Arc::new(store), MatchingConfig::default())
    }

    fn shop() -> ProductResolver {
        resolver(
            vec![
                product("p1", "iPhone 11", 400, "iphone 11 apple phone"),
                product("p2", "Dell Vostro laptop", 600, "dell vostro laptop"),
            ],
            &[("p1", &["p2"])],
        )
    }

    #[test]
    fn end_to_end_detail_reply_sets_last_product() {
        let outcome = shop().resolve("tell me about iphone 11");

        assert_eq!(outcome.reply.format, ReplyFormat::Markdown);
        assert!(outcome.reply.text.contains("iPhone 11"));
        assert!(outcome.reply.text.contains("$400"));
        assert!(outcome.reply.text.contains("Dell Vostro laptop ($600)"));
        assert_eq!(outcome.context_update, Some(SlotUpdate::LastProduct(ProductId::from("p1"))));
    }

    #[test]
    fn blank_utterance_asks_for_clarification() {
        for utterance in ["", "   ", "\n\t"] {
            let outcome = shop().resolve(utterance);
            assert_eq!(outcome.reply.text, EMPTY_UTTERANCE_PROMPT);
            assert!(outcome.context_update.is_none());
        }
        let empty = resolver(Vec::new(), &[]);
        assert_eq!(empty.resolve(" ").reply.text, EMPTY_UTTERANCE_PROMPT);
    }

    #[test]
    fn no_positive_score_returns_not_found() {
        let outcome = shop().resolve("do you sell bicycles");
        assert_eq!(outcome.reply.text, NOT_FOUND_MESSAGE);
        assert_eq!(outcome.reply.format, ReplyFormat::Plain);
        assert!(outcome.context_update.is_none());
    }

    #[test]
    fn mixed_case_keywords_do_not_match() {
        let catalog = resolver(vec![product("p1", "iPhone 11", 400, "iPhone Apple")], &[]);
        let outcome = catalog.resolve("Tell me about iPhone");
        assert_eq!(outcome.reply.text, NOT_FOUND_MESSAGE);
        assert!(outcome.context_update.is_none());
    }

    #[test]
    fn empty_catalog_always_returns_not_found() {
        let outcome = resolver(Vec::new(), &[]).resolve("tell me about iphone 11");
        assert_eq!(outcome.reply.text, NOT_FOUND_MESSAGE);
        assert!(outcome.context_update.is_none());
    }

    #[test]
    fn more_matching_tokens_beat_catalog_position() {
        let resolver = resolver(
            vec![
                product("a", "Galaxy A12", 150, "galaxy samsung"),
                product("b", "Galaxy S21", 700, "galaxy samsung s21"),
            ],
            &[],
        );
        let result = resolver.match_products("samsung galaxy s21");
        let best = result.best.expect("a match");

        assert_eq!(best.product.id, ProductId::from("b"));
        assert_eq!(best.score, 3);
        assert_eq!(result.candidates.len(), 2);
    }

    #[test]
    fn ties_go_to_the_earliest_entry() {
        let resolver = resolver(
            vec![
                product("first", "Redmi Note 9", 180, "redmi note"),
                product("second", "Redmi Note 10", 200, "redmi note"),
            ],
            &[],
        );
        let outcome = resolver.resolve("redmi note please");
        assert_eq!(outcome.context_update, Some(SlotUpdate::LastProduct(ProductId::from("first"))));
    }

    #[test]
    fn type_hint_filters_by_name_markers() {
        let resolver = resolver(
            vec![
                product("case", "Silicone Case", 20, "case iphone cover"),
                product("p1", "iPhone 11", 400, "iphone 11"),
            ],
            &[],
        );
        // The case scores on "iphone" but its name carries no phone marker.
        let result = resolver.match_products("iphone case");
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.best.map(|best| best.product.id.clone()), Some(ProductId::from("p1")));
    }

    #[test]
    fn availability_question_lists_names_in_catalog_order() {
        let resolver = resolver(
            vec![
                product("p1", "iPhone 11", 400, "phone iphone"),
                product("p2", "Redmi Note 9", 180, "phone redmi android"),
                product("p3", "Dell Vostro laptop", 600, "laptop dell"),
            ],
            &[],
        );
        let outcome = resolver.resolve("Do you have an android phone?");

        assert_eq!(
            outcome.reply.text,
            "Yes, I have these phones available:\n• iPhone 11\n• Redmi Note 9\n\nAsk me about a specific one to see details."
        );
        assert!(!outcome.reply.text.contains('$'));
        assert!(outcome.context_update.is_none());
    }

    #[test]
    fn availability_list_is_capped_at_five() {
        let products = (1..=7)
            .map(|n| product(&format!("p{n}"), &format!("Laptop Model {n}"), 500, "laptop"))
            .collect();
        let outcome = resolver(products, &[]).resolve("have laptop");

        assert_eq!(outcome.reply.text.matches("• ").count(), 5);
        assert!(outcome.reply.text.contains("Laptop Model 5"));
        assert!(!outcome.reply.text.contains("Laptop Model 6"));
    }

    #[test]
    fn availability_without_candidates_is_negative() {
        let outcome = shop().resolve("any notebook available?");
        assert_eq!(outcome.reply.text, NOTHING_AVAILABLE_MESSAGE);
        assert!(outcome.context_update.is_none());
    }

    #[test]
    fn availability_phrasing_without_type_hint_falls_through() {
        let resolver = resolver(vec![product("cable", "USB-C Cable", 10, "usb cable")], &[]);
        let outcome = resolver.resolve("do you have a usb cable");

        assert!(outcome.reply.text.starts_with("*USB-C Cable*"));
        assert_eq!(outcome.context_update, Some(SlotUpdate::LastProduct(ProductId::from("cable"))));
    }

    #[test]
    fn availability_phrasings() {
        assert!(is_availability_question("do you have phones"));
        assert!(is_availability_question("have laptops?"));
        assert!(is_availability_question("is the vostro available?"));
        assert!(!is_availability_question("behave phone"));
        assert!(!is_availability_question("available phones"));
        assert_eq!(normalize_utterance("  Tell Me ABOUT iPhone "), "tell me about iphone");
    }
}
