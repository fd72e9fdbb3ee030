//! Localized (Chinese) company names.
//!
//! Lookups hit the `stock_names` table first and fall back to a static
//! dictionary shipped as a JSON data file.

mod dictionary;
mod model;
mod service;
mod store;

pub use dictionary::NameDictionary;
pub use model::{LocalizedName, NameSource};
pub use service::{LocalizedNameService, LocalizedNameServiceTrait};
pub use store::LocalizedNameStore;
