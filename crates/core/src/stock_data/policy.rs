//! Freshness and call-budget policy.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::model::{CacheEntry, DataType};

pub const DEFAULT_QUOTE_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_PROFILE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_CANDLES_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_NEWS_TTL: Duration = Duration::from_secs(1800);
pub const DEFAULT_METRICS_TTL: Duration = Duration::from_secs(86_400);

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CACHE_RETENTION: Duration = Duration::from_secs(7 * 86_400);

/// Call records older than the widest budget window are never counted.
pub const CALL_LOG_RETENTION: Duration = Duration::from_secs(86_400);

/// Time-to-live per data type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    pub quote: Duration,
    pub profile: Duration,
    pub candles: Duration,
    pub news: Duration,
    pub metrics: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            quote: DEFAULT_QUOTE_TTL,
            profile: DEFAULT_PROFILE_TTL,
            candles: DEFAULT_CANDLES_TTL,
            news: DEFAULT_NEWS_TTL,
            metrics: DEFAULT_METRICS_TTL,
        }
    }
}

impl CachePolicy {
    pub fn ttl(&self, data_type: DataType) -> Duration {
        match data_type {
            DataType::Quote => self.quote,
            DataType::Profile => self.profile,
            DataType::Candles => self.candles,
            DataType::News => self.news,
            DataType::Metrics => self.metrics,
        }
    }

    /// `now - updated_at <= ttl`.
    pub fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        entry.age(now) <= to_chrono(self.ttl(entry.data_type))
    }
}

/// Rolling-window ceilings on upstream calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallBudget {
    pub max_calls_per_minute: u32,
    pub max_calls_per_day: u32,
}

impl Default for CallBudget {
    fn default() -> Self {
        Self {
            max_calls_per_minute: 60,
            max_calls_per_day: 1000,
        }
    }
}

/// The rolling window that ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetWindow {
    Minute,
    Day,
}

impl BudgetWindow {
    pub fn length(&self) -> chrono::Duration {
        match self {
            BudgetWindow::Minute => chrono::Duration::seconds(60),
            BudgetWindow::Day => chrono::Duration::hours(24),
        }
    }

    /// Suggested wait before the caller retries.
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            BudgetWindow::Minute => 60,
            BudgetWindow::Day => 3600,
        }
    }

    /// Records with `created_at` strictly after this instant are inside the window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.length()
    }
}

/// Outcome of a budget check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetDecision {
    Allowed,
    Exhausted(BudgetWindow),
}

impl CallBudget {
    /// Both windows must have room (minute window reported first).
    pub fn evaluate(&self, calls_last_minute: i64, calls_last_day: i64) -> BudgetDecision {
        if calls_last_minute >= i64::from(self.max_calls_per_minute) {
            BudgetDecision::Exhausted(BudgetWindow::Minute)
        } else if calls_last_day >= i64::from(self.max_calls_per_day) {
            BudgetDecision::Exhausted(BudgetWindow::Day)
        } else {
            BudgetDecision::Allowed
        }
    }
}

/// Result of an atomic check-and-record against the call log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reservation {
    /// A call record was appended; the id allows releasing it again.
    Granted(i64),
    Denied(BudgetWindow),
}

/// Tunables of the gateway service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub policy: CachePolicy,
    pub budget: CallBudget,
    pub upstream_timeout: Duration,
    pub cache_retention: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            policy: CachePolicy::default(),
            budget: CallBudget::default(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            cache_retention: DEFAULT_CACHE_RETENTION,
        }
    }
}

pub(crate) fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry_at(data_type: DataType, updated_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            cache_key: "k".to_string(),
            symbol: "AAPL".to_string(),
            data_type,
            payload: json!({}),
            updated_at,
        }
    }

    #[test]
    fn test_freshness_boundary_is_inclusive() {
        let policy = CachePolicy::default();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entry = entry_at(DataType::Quote, t0);

        assert!(policy.is_fresh(&entry, t0 + chrono::Duration::seconds(60)));
        assert!(!policy.is_fresh(&entry, t0 + chrono::Duration::seconds(61)));
    }

    #[test]
    fn test_ttl_differs_by_type() {
        let policy = CachePolicy::default();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = t0 + chrono::Duration::minutes(10);

        assert!(!policy.is_fresh(&entry_at(DataType::Candles, t0), later));
        assert!(policy.is_fresh(&entry_at(DataType::News, t0), later));
        assert!(policy.is_fresh(&entry_at(DataType::Profile, t0), later));
    }

    #[test]
    fn test_budget_requires_both_windows() {
        let budget = CallBudget::default();
        assert_eq!(budget.evaluate(59, 999), BudgetDecision::Allowed);
        assert_eq!(
            budget.evaluate(60, 10),
            BudgetDecision::Exhausted(BudgetWindow::Minute)
        );
        assert_eq!(
            budget.evaluate(3, 1000),
            BudgetDecision::Exhausted(BudgetWindow::Day)
        );
    }

    #[test]
    fn test_retry_hints() {
        assert_eq!(BudgetWindow::Minute.retry_after_secs(), 60);
        assert_eq!(BudgetWindow::Day.retry_after_secs(), 3600);
    }
}
