use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::stock_names)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockNameDB {
    pub ticker: String,
    pub name_zh: String,
    pub updated_at: NaiveDateTime,
}
