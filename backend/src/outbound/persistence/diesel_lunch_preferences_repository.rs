//! PostgreSQL-backed [`LunchPreferencesRepository`] implementation.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LunchPreferencesRepository, RepositoryError};
use crate::domain::{LunchPreferences, StudentId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LunchPreferencesRow, UpsertLunchPreferencesRow};
use super::pool::DbPool;
use super::schema::lunch_preferences;

/// Diesel adapter for per-student lunch preferences.
#[derive(Clone)]
pub struct DieselLunchPreferencesRepository {
    pool: DbPool,
}

impl DieselLunchPreferencesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LunchPreferencesRepository for DieselLunchPreferencesRepository {
    async fn find_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<LunchPreferences>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LunchPreferencesRow> = lunch_preferences::table
            .filter(lunch_preferences::student_id.eq(student_id.as_uuid()))
            .select(LunchPreferencesRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| LunchPreferences {
            dietary: row.dietary,
            allergies: row.allergies,
            favorites: row.favorites,
        }))
    }

    async fn upsert(
        &self,
        student_id: StudentId,
        preferences: &LunchPreferences,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = UpsertLunchPreferencesRow {
            student_id: *student_id.as_uuid(),
            dietary: &preferences.dietary,
            allergies: &preferences.allergies,
            favorites: &preferences.favorites,
            updated_at: Utc::now(),
        };
        diesel::insert_into(lunch_preferences::table)
            .values(&row)
            .on_conflict(lunch_preferences::student_id)
            .do_update()
            .set((
                lunch_preferences::dietary.eq(excluded(lunch_preferences::dietary)),
                lunch_preferences::allergies.eq(excluded(lunch_preferences::allergies)),
                lunch_preferences::favorites.eq(excluded(lunch_preferences::favorites)),
                lunch_preferences::updated_at.eq(excluded(lunch_preferences::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
