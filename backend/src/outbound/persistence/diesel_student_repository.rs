//! PostgreSQL-backed [`StudentRepository`] implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, StudentRepository};
use crate::domain::{Student, StudentId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewStudentRow, StudentChangeset, StudentRow};
use super::pool::DbPool;
use super::schema::students;

/// Diesel adapter for the student roster.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn insert(&self, student: &Student) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewStudentRow {
            id: *student.id.as_uuid(),
            parent_id: student.parent_id.map(|id| *id.as_uuid()),
            name: &student.name,
            grade: &student.grade,
            admission_number: &student.admission_number,
            dietary_preferences: &student.dietary_preferences,
            allergies: &student.allergies,
            other_allergies: student.other_allergies.as_deref(),
            additional_notes: student.additional_notes.as_deref(),
            balance: student.balance.minor(),
            status: student.status.as_str(),
            last_payment_at: student.last_payment_at,
            created_at: student.created_at,
            updated_at: student.updated_at,
        };
        diesel::insert_into(students::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<StudentRow> = students::table
            .filter(students::id.eq(id.as_uuid()))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(StudentRow::into_domain).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Student>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StudentRow> = students::table
            .order(students::name.asc())
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(StudentRow::into_domain).collect()
    }

    async fn list_by_parent(&self, parent_id: UserId) -> Result<Vec<Student>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StudentRow> = students::table
            .filter(students::parent_id.eq(parent_id.as_uuid()))
            .order(students::name.asc())
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(StudentRow::into_domain).collect()
    }

    async fn update(&self, student: &Student) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Balance is deliberately absent: only the payment and lunch-order
        // transactions may move money.
        let changeset = StudentChangeset {
            name: &student.name,
            grade: &student.grade,
            admission_number: &student.admission_number,
            dietary_preferences: &student.dietary_preferences,
            allergies: &student.allergies,
            other_allergies: student.other_allergies.as_deref(),
            additional_notes: student.additional_notes.as_deref(),
            status: student.status.as_str(),
            updated_at: student.updated_at,
        };
        let updated = diesel::update(students::table.filter(students::id.eq(student.id.as_uuid())))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(RepositoryError::query("student not found for update"));
        }
        Ok(())
    }

    async fn delete(&self, id: StudentId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(students::table.filter(students::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
