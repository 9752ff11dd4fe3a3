pub mod label;
pub mod product;
pub mod search_response;

pub use label::{Label, DEFAULT_LABEL_WEIGHT};
pub use product::{MatchedLabel, Product, ScoredProduct};
pub use search_response::{count_products, CatalogResponse, SearchResponse};
