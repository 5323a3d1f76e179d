//! Persistence port for lunch orders and serve records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::RepositoryError;
use crate::domain::{Amount, LunchOrder, StudentId};

/// Listing constraints; `date` matches the whole calendar day (UTC).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LunchOrderQuery {
    pub student_id: Option<StudentId>,
    pub date: Option<DateTime<Utc>>,
}

/// Persistence port for lunch orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LunchOrderRepository: Send + Sync {
    /// Insert a placed order without touching the balance.
    async fn insert(&self, order: &LunchOrder) -> Result<(), RepositoryError>;

    /// List orders matching the query, newest first.
    async fn list(&self, query: &LunchOrderQuery) -> Result<Vec<LunchOrder>, RepositoryError>;

    /// Insert a serve record and debit the student balance by the order
    /// amount in one transaction; returns the balance after the debit.
    async fn insert_with_debit(&self, order: &LunchOrder) -> Result<Amount, RepositoryError>;
}
