//! SQLite storage for cached provider payloads.

mod model;
mod repository;

pub use model::StockCacheDB;
pub use repository::StockCacheRepository;
