//! Common product schema shared by every source adapter

mod query;
mod types;

pub use query::SearchQuery;
pub use types::Product;
