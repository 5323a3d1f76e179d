//! Lunch service HTTP handlers: serving line, menu, orders and preferences.
//!
//! ```text
//! GET  /api/v1/lunch/eligibility
//! POST /api/v1/lunch/serve
//! GET  /api/v1/menu
//! POST /api/v1/menu
//! GET  /api/v1/lunch/orders
//! POST /api/v1/lunch/orders
//! GET  /api/v1/lunch/preferences/{studentId}
//! PUT  /api/v1/lunch/preferences/{studentId}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    EligibilityRow, LunchOrderFilter, NewMenuItemRequest, PlaceOrderRequest, PreferencesUpdate,
    ServeLunchRequest,
};
use crate::domain::{Amount, LunchOrder, LunchPreferences, MenuItem, MenuItemId, StudentId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_rfc3339_timestamp};

/// One row of the serving-line eligibility report. Amounts are in kobo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    pub student_id: String,
    pub name: String,
    pub grade: String,
    pub balance: i64,
    pub daily_rate: i64,
    pub status: String,
}

impl From<EligibilityRow> for EligibilityResponse {
    fn from(row: EligibilityRow) -> Self {
        Self {
            student_id: row.student_id.to_string(),
            name: row.name,
            grade: row.grade,
            balance: row.balance.minor(),
            daily_rate: row.daily_rate.minor(),
            status: row.status.as_str().to_owned(),
        }
    }
}

/// Request body for serving lunch. Amounts are in kobo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServeRequest {
    pub student_id: Uuid,
    /// Overrides the configured daily rate when set.
    pub daily_rate: Option<i64>,
}

/// Request body for adding a menu item. Prices are in kobo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: Option<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Menu item details returned to clients. Prices are in kobo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: String,
    pub allergens: Vec<String>,
    pub available: bool,
    pub created_at: String,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            description: item.description,
            price: item.price.minor(),
            category: item.category,
            allergens: item.allergens,
            available: item.available,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

/// Request body for placing a lunch order.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub student_id: Uuid,
    pub menu_item_id: Uuid,
    pub special_instructions: Option<String>,
    /// RFC 3339 timestamp of the day the order is for; defaults to today.
    pub date: Option<String>,
}

/// Lunch order details returned to clients. Amounts are in kobo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LunchOrderResponse {
    pub id: String,
    pub student_id: String,
    pub menu_item_id: Option<String>,
    pub amount: i64,
    pub status: String,
    pub date: String,
    pub special_instructions: Option<String>,
    pub created_at: String,
}

impl From<LunchOrder> for LunchOrderResponse {
    fn from(order: LunchOrder) -> Self {
        Self {
            id: order.id.to_string(),
            student_id: order.student_id.to_string(),
            menu_item_id: order.menu_item_id.map(|id| id.to_string()),
            amount: order.amount.minor(),
            status: order.status.as_str().to_owned(),
            date: order.date.to_rfc3339(),
            special_instructions: order.special_instructions,
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

/// Listing filter accepted by `GET /api/v1/lunch/orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub student_id: Option<Uuid>,
    /// RFC 3339 timestamp; the filter covers that calendar day.
    pub date: Option<String>,
}

/// Request body replacing a student's lunch preferences.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub dietary: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub favorites: Option<Vec<String>>,
}

/// Lunch preferences returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub dietary: Vec<String>,
    pub allergies: Vec<String>,
    pub favorites: Vec<String>,
}

impl From<LunchPreferences> for PreferencesResponse {
    fn from(preferences: LunchPreferences) -> Self {
        Self {
            dietary: preferences.dietary,
            allergies: preferences.allergies,
            favorites: preferences.favorites,
        }
    }
}

/// Eligibility of every active student against the daily rate (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/lunch/eligibility",
    responses(
        (status = 200, description = "Eligibility report", body = [EligibilityResponse]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Admin access required", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "eligibilityReport"
)]
#[get("/lunch/eligibility")]
pub async fn eligibility_report(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<Vec<EligibilityResponse>>> {
    let rows = state.lunch.eligibility_report(auth.caller()).await?;
    Ok(web::Json(
        rows.into_iter().map(EligibilityResponse::from).collect(),
    ))
}

/// Serve lunch to a student, debiting their balance (admin only).
#[utoipa::path(
    post,
    path = "/api/v1/lunch/serve",
    request_body = ServeRequest,
    responses(
        (status = 201, description = "Lunch served", body = LunchOrderResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Admin access required", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "serveLunch"
)]
#[post("/lunch/serve")]
pub async fn serve_lunch(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<ServeRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let order = state
        .lunch
        .serve(
            auth.caller(),
            ServeLunchRequest {
                student_id: StudentId::from_uuid(payload.student_id),
                daily_rate: payload.daily_rate.map(Amount::from_minor),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(LunchOrderResponse::from(order)))
}

/// List the menu.
#[utoipa::path(
    get,
    path = "/api/v1/menu",
    responses(
        (status = 200, description = "Menu items", body = [MenuItemResponse]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "listMenu"
)]
#[get("/menu")]
pub async fn list_menu(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<Vec<MenuItemResponse>>> {
    let items = state.lunch.list_menu(auth.caller()).await?;
    Ok(web::Json(
        items.into_iter().map(MenuItemResponse::from).collect(),
    ))
}

/// Add a menu item (admin only).
#[utoipa::path(
    post,
    path = "/api/v1/menu",
    request_body = MenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Admin access required", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "createMenuItem"
)]
#[post("/menu")]
pub async fn create_menu_item(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<MenuItemRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let item = state
        .lunch
        .create_menu_item(
            auth.caller(),
            NewMenuItemRequest {
                name: payload.name,
                description: payload.description,
                price: Amount::from_minor(payload.price),
                category: payload.category,
                allergens: payload.allergens,
                available: payload.available,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(MenuItemResponse::from(item)))
}

/// List lunch orders visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/lunch/orders",
    params(
        ("studentId" = Option<Uuid>, Query, description = "Limit to one student"),
        ("date" = Option<String>, Query, description = "RFC 3339 timestamp; filters that calendar day")
    ),
    responses(
        (status = 200, description = "Lunch orders", body = [LunchOrderResponse]),
        (status = 400, description = "Invalid filter", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "listLunchOrders"
)]
#[get("/lunch/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<OrderListQuery>,
) -> ApiResult<web::Json<Vec<LunchOrderResponse>>> {
    let query = query.into_inner();
    let date = parse_optional_rfc3339_timestamp(query.date.as_deref(), FieldName::new("date"))?;
    let orders = state
        .lunch
        .list_orders(
            auth.caller(),
            LunchOrderFilter {
                student_id: query.student_id.map(StudentId::from_uuid),
                date,
            },
        )
        .await?;
    Ok(web::Json(
        orders.into_iter().map(LunchOrderResponse::from).collect(),
    ))
}

/// Place a lunch order for an owned student.
#[utoipa::path(
    post,
    path = "/api/v1/lunch/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order placed", body = LunchOrderResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Student or menu item not found", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "placeLunchOrder"
)]
#[post("/lunch/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<OrderRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let date = parse_optional_rfc3339_timestamp(payload.date.as_deref(), FieldName::new("date"))?;
    let order = state
        .lunch
        .place_order(
            auth.caller(),
            PlaceOrderRequest {
                student_id: StudentId::from_uuid(payload.student_id),
                menu_item_id: MenuItemId::from_uuid(payload.menu_item_id),
                special_instructions: payload.special_instructions,
                date,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(LunchOrderResponse::from(order)))
}

/// Fetch a student's lunch preferences.
#[utoipa::path(
    get,
    path = "/api/v1/lunch/preferences/{studentId}",
    params(("studentId" = Uuid, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Lunch preferences", body = PreferencesResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "getLunchPreferences"
)]
#[get("/lunch/preferences/{student_id}")]
pub async fn get_preferences(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<PreferencesResponse>> {
    let preferences = state
        .lunch
        .preferences(auth.caller(), StudentId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(preferences.into()))
}

/// Replace a student's lunch preferences field by field.
#[utoipa::path(
    put,
    path = "/api/v1/lunch/preferences/{studentId}",
    request_body = PreferencesRequest,
    params(("studentId" = Uuid, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Updated preferences", body = PreferencesResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error)
    ),
    tags = ["lunch"],
    operation_id = "updateLunchPreferences"
)]
#[put("/lunch/preferences/{student_id}")]
pub async fn update_preferences(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<PreferencesRequest>,
) -> ApiResult<web::Json<PreferencesResponse>> {
    let payload = payload.into_inner();
    let preferences = state
        .lunch
        .update_preferences(
            auth.caller(),
            StudentId::from_uuid(path.into_inner()),
            PreferencesUpdate {
                dietary: payload.dietary,
                allergies: payload.allergies,
                favorites: payload.favorites,
            },
        )
        .await?;
    Ok(web::Json(preferences.into()))
}
