//! On-disk shape of the exported recommender artifact.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::domain::product::{ProductId, ProductRecord};

#[derive(Debug, Deserialize)]
pub struct CatalogArtifact {
    pub recommender: HashMap<ProductId, Vec<ProductId>>,
    pub item_info: OrderedItems,
    #[serde(default)]
    pub category_keywords: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ItemInfo {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// `item_info` entries in document order.
///
/// Matching breaks ties by catalog position, so the order keys appear in the
/// artifact has to survive deserialization. A repeated key keeps the first
/// position and the last value.
#[derive(Debug, Default)]
pub struct OrderedItems(pub Vec<ProductRecord>);

impl<'de> Deserialize<'de> for OrderedItems {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedItemsVisitor;

        impl<'de> Visitor<'de> for OrderedItemsVisitor {
            type Value = OrderedItems;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of product id to item info")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut records: Vec<ProductRecord> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, info)) = map.next_entry::<String, ItemInfo>()? {
                    let record = ProductRecord::new(
                        id,
                        info.name,
                        info.price,
                        info.category,
                        info.keywords.as_deref().unwrap_or_default(),
                    );
                    match records.iter_mut().find(|existing| existing.id == record.id) {
                        Some(existing) => *existing = record,
                        None => records.push(record),
                    }
                }
                Ok(OrderedItems(records))
            }
        }

        deserializer.deserialize_map(OrderedItemsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::CatalogArtifact;
    use crate::domain::product::ProductId;

    #[test]
    fn item_info_keeps_document_order() {
        let artifact: CatalogArtifact = serde_json::from_str(
            r#"{
                "recommender": {},
                "item_info": {
                    "zeta": {"name": "Zeta", "price": 1},
                    "alpha": {"name": "Alpha", "price": 2},
                    "mid": {"name": "Mid", "price": 3}
                }
            }"#,
        )
        .expect("artifact should parse");

        let ids: Vec<&str> = artifact.item_info.0.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
        assert!(artifact.category_keywords.is_empty());
    }

    #[test]
    fn repeated_id_keeps_position_and_last_value() {
        let artifact: CatalogArtifact = serde_json::from_str(
            r#"{
                "recommender": {"a": ["b", "b", "missing"]},
                "item_info": {
                    "a": {"name": "First", "price": 1},
                    "b": {"name": "B", "price": "2.50"},
                    "a": {"name": "Second", "price": 3, "category": "audio"}
                }
            }"#,
        )
        .expect("artifact should parse");

        let records = &artifact.item_info.0;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Second");
        assert_eq!(records[0].category.as_deref(), Some("audio"));
        assert_eq!(records[1].price, Decimal::new(250, 2));
        assert_eq!(
            artifact.recommender[&ProductId::from("a")],
            vec![ProductId::from("b"), ProductId::from("b"), ProductId::from("missing")]
        );
    }

    #[test]
    fn record_without_name_is_a_schema_error() {
        let result = serde_json::from_str::<CatalogArtifact>(
            r#"{"recommender": {}, "item_info": {"a": {"price": 1}}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_recommender_is_a_schema_error() {
        let result = serde_json::from_str::<CatalogArtifact>(r#"{"item_info": {}}"#);
        assert!(result.is_err());
    }
}
