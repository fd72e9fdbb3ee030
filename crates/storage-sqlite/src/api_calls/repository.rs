use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::api_calls::dsl as api_calls_dsl;
use stockcache_core::stock_data::{
    ApiCallStore, BudgetDecision, BudgetWindow, CallBudget, Reservation,
};
use stockcache_core::Result;

pub struct ApiCallRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ApiCallRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn count_after(conn: &mut SqliteConnection, cutoff: NaiveDateTime) -> QueryResult<i64> {
    api_calls_dsl::api_calls
        .filter(api_calls_dsl::created_at.gt(cutoff))
        .count()
        .get_result(conn)
}

#[async_trait]
impl ApiCallStore for ApiCallRepository {
    fn count_calls_since(&self, cutoff: DateTime<Utc>) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        count_after(&mut conn, cutoff.naive_utc()).into_core()
    }

    async fn try_reserve_call(
        &self,
        now: DateTime<Utc>,
        budget: &CallBudget,
    ) -> Result<Reservation> {
        let budget = budget.clone();
        let minute_cutoff = BudgetWindow::Minute.cutoff(now).naive_utc();
        let day_cutoff = BudgetWindow::Day.cutoff(now).naive_utc();
        let created_at = now.naive_utc();

        // Counting and inserting in one writer job keeps the check atomic
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Reservation> {
                let minute = count_after(conn, minute_cutoff).into_core()?;
                let day = count_after(conn, day_cutoff).into_core()?;

                match budget.evaluate(minute, day) {
                    BudgetDecision::Exhausted(window) => {
                        debug!(
                            "Call budget exhausted ({:?}): {} this minute, {} today",
                            window, minute, day
                        );
                        Ok(Reservation::Denied(window))
                    }
                    BudgetDecision::Allowed => {
                        let id = diesel::insert_into(api_calls_dsl::api_calls)
                            .values(api_calls_dsl::created_at.eq(created_at))
                            .returning(api_calls_dsl::id)
                            .get_result::<i64>(conn)
                            .into_core()?;
                        Ok(Reservation::Granted(id))
                    }
                }
            })
            .await
    }

    async fn release_call(&self, call_id: i64) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(api_calls_dsl::api_calls.find(call_id))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    async fn purge_calls_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let cutoff = cutoff.naive_utc();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(api_calls_dsl::api_calls.filter(api_calls_dsl::created_at.lt(cutoff)))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
