//! Cache-and-rate-limit gateway for upstream stock data.
//!
//! - [`model`] - Data types, payload sources and the response shape
//! - [`request`] - Caller input validation and cache key construction
//! - [`policy`] - TTLs per data type and the rolling call budget
//! - [`store`] - Storage traits for cache rows and the call log
//! - [`service`] - The gateway itself
//!
//! # Request flow
//!
//! ```text
//! fresh cache row? ──yes──> source = cache
//!        │ no
//!        ▼
//! per-key lock, re-check cache
//!        │
//!        ▼
//! reserve call budget ──denied──> stale row? source = stale_cache : RateLimitExceeded
//!        │ granted
//!        ▼
//! upstream ──error──> stale row? source = fallback_cache : Upstream error
//!        │ ok
//!        ▼
//! upsert row, source = api
//! ```

mod locks;
pub mod model;
pub mod policy;
pub mod request;
pub mod service;
pub mod store;


pub use model::{BudgetUsage, CacheEntry, DataSource, DataType, PurgeReport, StockData};
pub use policy::{
    BudgetDecision, BudgetWindow, CachePolicy, CallBudget, GatewayConfig, Reservation,
    CALL_LOG_RETENTION,
};
pub use request::{DataQuery, RangeBound, StockDataParams, StockDataRequest};
pub use service::{StockDataService, StockDataServiceTrait};
pub use store::{ApiCallStore, StockCacheStore};
