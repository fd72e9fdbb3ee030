//! SQLite storage for the upstream call log.

mod repository;

pub use repository::ApiCallRepository;
