//! SQLite storage for localized company names.

mod model;
mod repository;

pub use model::StockNameDB;
pub use repository::StockNameRepository;
