//! Student roster HTTP handlers.
//!
//! ```text
//! GET    /api/v1/students
//! POST   /api/v1/students
//! PUT    /api/v1/students/{id}
//! DELETE /api/v1/students/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{NewStudentRequest, StudentPatch};
use crate::domain::{Student, StudentId, StudentStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Request body for registering a student.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
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

/// Partial update body; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatchRequest {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub admission_number: Option<String>,
    pub dietary_preferences: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub other_allergies: Option<String>,
    pub additional_notes: Option<String>,
    /// `active` or `inactive`.
    pub status: Option<String>,
}

/// Student details returned to clients. Balances are in kobo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub grade: String,
    pub admission_number: String,
    pub dietary_preferences: Vec<String>,
    pub allergies: Vec<String>,
    pub other_allergies: Option<String>,
    pub additional_notes: Option<String>,
    pub balance: i64,
    pub status: String,
    pub last_payment_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.to_string(),
            parent_id: student.parent_id.map(|id| id.to_string()),
            name: student.name,
            grade: student.grade,
            admission_number: student.admission_number,
            dietary_preferences: student.dietary_preferences,
            allergies: student.allergies,
            other_allergies: student.other_allergies,
            additional_notes: student.additional_notes,
            balance: student.balance.minor(),
            status: student.status.as_str().to_owned(),
            last_payment_at: student.last_payment_at.map(|at| at.to_rfc3339()),
            created_at: student.created_at.to_rfc3339(),
            updated_at: student.updated_at.to_rfc3339(),
        }
    }
}

fn parse_status(raw: &str) -> ApiResult<StudentStatus> {
    StudentStatus::from_str(raw)
        .map_err(|_| invalid_value_error(FieldName::new("status"), raw, "active or inactive"))
}

/// List the students visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    responses(
        (status = 200, description = "Visible students", body = [StudentResponse]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<Vec<StudentResponse>>> {
    let students = state.students.list(auth.caller()).await?;
    Ok(web::Json(
        students.into_iter().map(StudentResponse::from).collect(),
    ))
}

/// Register a student under the calling parent.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid request or duplicate admission number", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "createStudent"
)]
#[post("/students")]
pub async fn create_student(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<StudentRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let student = state
        .students
        .create(
            auth.caller(),
            NewStudentRequest {
                name: payload.name,
                grade: payload.grade,
                admission_number: payload.admission_number,
                dietary_preferences: payload.dietary_preferences,
                allergies: payload.allergies,
                other_allergies: payload.other_allergies,
                additional_notes: payload.additional_notes,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(StudentResponse::from(student)))
}

/// Apply a partial update to an owned student.
#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    request_body = StudentPatchRequest,
    params(("id" = Uuid, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Updated student", body = StudentResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "updateStudent"
)]
#[put("/students/{id}")]
pub async fn update_student(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<StudentPatchRequest>,
) -> ApiResult<web::Json<StudentResponse>> {
    let payload = payload.into_inner();
    let status = payload.status.as_deref().map(parse_status).transpose()?;
    let patch = StudentPatch {
        name: payload.name,
        grade: payload.grade,
        admission_number: payload.admission_number,
        dietary_preferences: payload.dietary_preferences,
        allergies: payload.allergies,
        other_allergies: payload.other_allergies,
        additional_notes: payload.additional_notes,
        status,
    };
    let student = state
        .students
        .update(auth.caller(), StudentId::from_uuid(path.into_inner()), patch)
        .await?;
    Ok(web::Json(student.into()))
}

/// Remove an owned student.
#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student identifier")),
    responses(
        (status = 204, description = "Student removed"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[delete("/students/{id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .students
        .remove(auth.caller(), StudentId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
