//! PostgreSQL-backed [`LunchOrderRepository`] implementation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{LunchOrderQuery, LunchOrderRepository, RepositoryError};
use crate::domain::{Amount, LunchOrder};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LunchOrderRow, NewLunchOrderRow};
use super::pool::DbPool;
use super::schema::{lunch_orders, students};

/// Diesel adapter for lunch orders and serve records.
#[derive(Clone)]
pub struct DieselLunchOrderRepository {
    pool: DbPool,
}

impl DieselLunchOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn new_row(order: &LunchOrder) -> NewLunchOrderRow<'_> {
    NewLunchOrderRow {
        id: *order.id.as_uuid(),
        student_id: *order.student_id.as_uuid(),
        menu_item_id: order.menu_item_id.map(|id| *id.as_uuid()),
        amount: order.amount.minor(),
        status: order.status.as_str(),
        date: order.date,
        special_instructions: order.special_instructions.as_deref(),
        created_at: order.created_at,
    }
}

#[async_trait]
impl LunchOrderRepository for DieselLunchOrderRepository {
    async fn insert(&self, order: &LunchOrder) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(lunch_orders::table)
            .values(&new_row(order))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list(&self, query: &LunchOrderQuery) -> Result<Vec<LunchOrder>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut stmt = lunch_orders::table.into_boxed();
        if let Some(student_id) = query.student_id {
            stmt = stmt.filter(lunch_orders::student_id.eq(*student_id.as_uuid()));
        }
        if let Some(date) = query.date {
            // A date filter selects the whole calendar day.
            let day_start = date
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
                .unwrap_or(date);
            let day_end = day_start + Duration::days(1);
            stmt = stmt
                .filter(lunch_orders::date.ge(day_start))
                .filter(lunch_orders::date.lt(day_end));
        }

        let rows: Vec<LunchOrderRow> = stmt
            .order(lunch_orders::date.desc())
            .select(LunchOrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(LunchOrderRow::into_domain).collect()
    }

    async fn insert_with_debit(&self, order: &LunchOrder) -> Result<Amount, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let student_id = *order.student_id.as_uuid();
        let amount = order.amount.minor();
        let now = Utc::now();
        let row = new_row(order);

        let balance_after: i64 = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(lunch_orders::table)
                        .values(&row)
                        .execute(conn)
                        .await?;

                    diesel::update(students::table.filter(students::id.eq(student_id)))
                        .set((
                            students::balance.eq(students::balance - amount),
                            students::updated_at.eq(now),
                        ))
                        .returning(students::balance)
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(Amount::from_minor(balance_after))
    }
}
