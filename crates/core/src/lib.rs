pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod vocabulary;

pub use catalog::{
    CatalogHealth, CatalogLoadError, CatalogStore, LoadedCatalog, RecommendationTable,
};
pub use config::{AppConfig, ConfigError, LoadOptions, MatchingConfig};
pub use domain::conversation::{ConversationContext, SlotUpdate, LAST_PRODUCT_SLOT};
pub use domain::product::{ProductId, ProductRecord};
pub use domain::reply::{Reply, ReplyFormat};
pub use errors::{ApplicationError, InterfaceError};
pub use vocabulary::{TypeHints, TypeVocabulary};
