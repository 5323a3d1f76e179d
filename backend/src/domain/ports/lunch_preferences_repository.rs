//! Persistence port for per-student lunch preferences.

use async_trait::async_trait;

use super::errors::RepositoryError;
use crate::domain::{LunchPreferences, StudentId};

/// Persistence port for dietary profiles. One row per student at most.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LunchPreferencesRepository: Send + Sync {
    /// Fetch the profile for a student, `None` when never saved.
    async fn find_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<LunchPreferences>, RepositoryError>;

    /// Insert or replace the profile for a student.
    async fn upsert(
        &self,
        student_id: StudentId,
        preferences: &LunchPreferences,
    ) -> Result<(), RepositoryError>;
}
