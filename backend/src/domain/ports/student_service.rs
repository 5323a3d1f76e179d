//! Driving port for student roster management.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Caller, Error, Student, StudentId, StudentStatus};

/// Payload for registering a student under the calling parent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewStudentRequest {
    pub name: String,
    pub grade: String,
    pub admission_number: String,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub other_allergies: Option<String>,
    pub additional_notes: Option<String>,
}

/// Partial update applied to an existing student. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub admission_number: Option<String>,
    pub dietary_preferences: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub other_allergies: Option<String>,
    pub additional_notes: Option<String>,
    pub status: Option<StudentStatus>,
}

/// Driving port for student operations. Parents see their own students;
/// admins see every student.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentService: Send + Sync {
    /// List the students visible to the caller.
    async fn list(&self, caller: &Caller) -> Result<Vec<Student>, Error>;

    /// Register a student under the calling parent.
    async fn create(&self, caller: &Caller, request: NewStudentRequest)
        -> Result<Student, Error>;

    /// Apply a partial update to an owned student.
    async fn update(
        &self,
        caller: &Caller,
        id: StudentId,
        patch: StudentPatch,
    ) -> Result<Student, Error>;

    /// Remove an owned student.
    async fn remove(&self, caller: &Caller, id: StudentId) -> Result<(), Error>;
}
