//! Product catalog and "frequently bought together" table.
//!
//! Both are loaded once from the exported artifact and never mutated after
//! that, so a single `Arc<CatalogStore>` can be shared by every conversation.

pub mod artifact;
mod loader;

use std::collections::HashMap;

use crate::domain::product::{ProductId, ProductRecord};

pub use loader::{CatalogHealth, CatalogLoadError, LoadedCatalog};

pub type RecommendationTable = HashMap<ProductId, Vec<ProductId>>;
pub type CategoryKeywords = HashMap<String, Vec<String>>;

#[derive(Clone, Debug, Default)]
pub struct CatalogStore {
    products: Vec<ProductRecord>,
    index: HashMap<ProductId, usize>,
    recommender: RecommendationTable,
    category_keywords: CategoryKeywords,
}

impl CatalogStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a store from already-parsed parts. A repeated product id replaces
    /// the earlier record in place.
    pub fn from_parts(
        products: Vec<ProductRecord>,
        recommender: RecommendationTable,
        category_keywords: CategoryKeywords,
    ) -> Self {
        let mut deduped: Vec<ProductRecord> = Vec::with_capacity(products.len());
        let mut index = HashMap::with_capacity(products.len());
        for product in products {
            match index.get(&product.id) {
                Some(&position) => deduped[position] = product,
                None => {
                    index.insert(product.id.clone(), deduped.len());
                    deduped.push(product);
                }
            }
        }

        Self { products: deduped, index, recommender, category_keywords }
    }

    pub fn product(&self, product_id: &ProductId) -> Option<&ProductRecord> {
        self.index.get(product_id).map(|position| &self.products[*position])
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    /// Related product ids in relevance order. Ids may point outside the catalog.
    pub fn recommendations(&self, product_id: &ProductId) -> &[ProductId] {
        self.recommender.get(product_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn category_keywords(&self) -> &CategoryKeywords {
        &self.category_keywords
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal::Decimal;

    use super::CatalogStore;
    use crate::domain::product::{ProductId, ProductRecord};

    fn record(id: &str, name: &str) -> ProductRecord {
        ProductRecord::new(id, name, Decimal::new(10, 0), None, "")
    }

    #[test]
    fn lookups_use_catalog_positions() {
        let mut recommender = HashMap::new();
        recommender.insert(ProductId::from("p1"), vec![ProductId::from("p2")]);
        let store = CatalogStore::from_parts(
            vec![record("p1", "One"), record("p2", "Two"), record("p1", "One again")],
            recommender,
            HashMap::new(),
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.products()[0].name, "One again");
        assert_eq!(store.product(&ProductId::from("p2")).map(|p| p.name.as_str()), Some("Two"));
        assert_eq!(store.recommendations(&ProductId::from("p1")), &[ProductId::from("p2")]);
        assert!(store.recommendations(&ProductId::from("p2")).is_empty());
        assert!(store.product(&ProductId::from("p3")).is_none());
    }

    #[test]
    fn empty_store_has_nothing() {
        let store = CatalogStore::empty();
        assert!(store.is_empty());
        assert!(store.product(&ProductId::from("p1")).is_none());
        assert!(store.category_keywords().is_empty());
    }
}
