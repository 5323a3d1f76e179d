//! PostgreSQL-backed [`PaymentRepository`] implementation.
//!
//! The credit and reversal operations pair the payment write with the
//! student balance update inside one database transaction, so a crash can
//! never leave a completed payment without its credit.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde_json::Value;

use crate::domain::ports::{PaymentFilter, PaymentRepository, RepositoryError};
use crate::domain::{Amount, Payment, PaymentId, PaymentStatus, StudentId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPaymentRow, PaymentRow};
use super::pool::DbPool;
use super::schema::{payments, students};

/// Diesel adapter for the payment lifecycle.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn new_row(payment: &Payment) -> NewPaymentRow<'_> {
    NewPaymentRow {
        id: *payment.id.as_uuid(),
        parent_id: *payment.parent_id.as_uuid(),
        student_id: *payment.student_id.as_uuid(),
        amount: payment.amount.minor(),
        payment_type: &payment.payment_type,
        category: &payment.category,
        description: payment.description.as_deref(),
        status: payment.status.as_str(),
        gateway_ref: payment.gateway_ref.as_deref(),
        payment_link: payment.payment_link.as_deref(),
        transaction_id: payment.transaction_id.as_deref(),
        gateway_payload: payment.gateway_payload.as_ref(),
        failure_reason: payment.failure_reason.as_deref(),
        created_at: payment.created_at,
        updated_at: payment.updated_at,
    }
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(payments::table)
            .values(&new_row(payment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PaymentRow> = payments::table
            .filter(payments::id.eq(id.as_uuid()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(PaymentRow::into_domain).transpose()
    }

    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = payments::table.into_boxed();
        if let Some(parent_id) = filter.parent_id {
            query = query.filter(payments::parent_id.eq(*parent_id.as_uuid()));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(payments::student_id.eq(*student_id.as_uuid()));
        }
        if let Some(status) = filter.status {
            query = query.filter(payments::status.eq(status.as_str()));
        }
        if let Some(payment_type) = filter.payment_type.clone() {
            query = query.filter(payments::payment_type.eq(payment_type));
        }

        let rows: Vec<PaymentRow> = query
            .order(payments::created_at.desc())
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(PaymentRow::into_domain).collect()
    }

    async fn record_gateway_session<'a>(
        &self,
        id: PaymentId,
        gateway_ref: Option<&'a str>,
        payment_link: &str,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(payments::table.filter(payments::id.eq(id.as_uuid())))
            .set((
                payments::gateway_ref.eq(gateway_ref),
                payments::payment_link.eq(payment_link),
                payments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn mark_failed(&self, id: PaymentId, reason: &str) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(payments::table.filter(payments::id.eq(id.as_uuid())))
            .set((
                payments::status.eq(PaymentStatus::Failed.as_str()),
                payments::failure_reason.eq(reason),
                payments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn complete_with_credit(
        &self,
        id: PaymentId,
        student_id: StudentId,
        amount: Amount,
        transaction_id: &str,
        payload: &Value,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();

        conn.transaction(|conn| {
            async move {
                diesel::update(payments::table.filter(payments::id.eq(id.as_uuid())))
                    .set((
                        payments::status.eq(PaymentStatus::Completed.as_str()),
                        payments::transaction_id.eq(transaction_id),
                        payments::gateway_payload.eq(payload),
                        payments::failure_reason.eq(None::<String>),
                        payments::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;

                diesel::update(students::table.filter(students::id.eq(student_id.as_uuid())))
                    .set((
                        students::balance.eq(students::balance + amount.minor()),
                        students::last_payment_at.eq(now),
                        students::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_completed_with_credit(
        &self,
        payment: &Payment,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let student_id = *payment.student_id.as_uuid();
        let amount = payment.amount.minor();
        let row = new_row(payment);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(payments::table)
                    .values(&row)
                    .execute(conn)
                    .await?;

                diesel::update(students::table.filter(students::id.eq(student_id)))
                    .set((
                        students::balance.eq(students::balance + amount),
                        students::last_payment_at.eq(now),
                        students::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn set_status(
        &self,
        id: PaymentId,
        status: PaymentStatus,
        reversal: Option<(StudentId, Amount)>,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();

        conn.transaction(|conn| {
            async move {
                diesel::update(payments::table.filter(payments::id.eq(id.as_uuid())))
                    .set((
                        payments::status.eq(status.as_str()),
                        payments::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;

                if let Some((student_id, amount)) = reversal {
                    diesel::update(students::table.filter(students::id.eq(student_id.as_uuid())))
                        .set((
                            students::balance.eq(students::balance - amount.minor()),
                            students::updated_at.eq(now),
                        ))
                        .execute(conn)
                        .await?;
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
