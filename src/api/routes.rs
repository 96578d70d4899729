//! HTTP route handlers
//!
//! Handlers decode the request, call into [`crate::core`], and serialize the result.
//! "Today" for period calculations is the server's local date.

use super::{
    SharedState,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use crate::{
    core::{
        buckets::{Granularity, TimeBucket},
        period::{self, Period},
        record::{self, RecordFields},
        report::{self, Ranking, Scope, Summary},
        user::{self, AuthContext, Role, UserInfo},
    },
    entities::RecordModel,
    errors::Result,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use serde::Deserialize;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_period(raw: Option<&str>, default: Period) -> Result<Period> {
    raw.map_or(Ok(default), str::parse)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Query string carrying an optional period keyword
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// `week`, `month`, `quarter`, `year` or `all`
    pub period: Option<String>,
}

/// POST /api/login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthContext>> {
    let ctx = user::authenticate(&state.db, &req.username, &req.password).await?;
    Ok(Json(ctx))
}

/// GET /api/records - all records, optionally narrowed to a period by date
pub async fn list_records(
    State(state): State<SharedState>,
    _ctx: AuthContext,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> Result<Json<Vec<RecordModel>>> {
    let period = parse_period(query.period.as_deref(), Period::All)?;
    let records = record::list_records(&state.db).await?;
    Ok(Json(period::filter_by_date(&records, period, today())))
}

/// POST /api/records
pub async fn create_record(
    State(state): State<SharedState>,
    ctx: AuthContext,
    ApiJson(input): ApiJson<RecordFields>,
) -> Result<(StatusCode, Json<RecordModel>)> {
    let created =
        record::create_record(&state.db, &ctx, &state.config.departments, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/records/{id}
pub async fn update_record(
    State(state): State<SharedState>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<RecordFields>,
) -> Result<Json<RecordModel>> {
    let updated =
        record::update_record(&state.db, &ctx, &state.config.departments, &id, &input).await?;
    Ok(Json(updated))
}

/// DELETE /api/records/{id}
pub async fn delete_record(
    State(state): State<SharedState>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode> {
    record::delete_record(&state.db, &ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/rankings/{scope} - defaults to the current week
pub async fn ranking(
    State(state): State<SharedState>,
    _ctx: AuthContext,
    ApiPath(scope): ApiPath<String>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> Result<Json<Ranking>> {
    let scope: Scope = scope.parse()?;
    let period = parse_period(query.period.as_deref(), Period::Week)?;
    Ok(Json(
        report::get_ranking(&state.db, scope, period, today()).await?,
    ))
}

/// GET /api/stats/{granularity}
pub async fn time_series(
    State(state): State<SharedState>,
    _ctx: AuthContext,
    ApiPath(granularity): ApiPath<String>,
) -> Result<Json<Vec<TimeBucket>>> {
    let granularity: Granularity = granularity.parse()?;
    Ok(Json(report::get_time_series(&state.db, granularity).await?))
}

/// GET /api/summary
pub async fn summary(
    State(state): State<SharedState>,
    _ctx: AuthContext,
) -> Result<Json<Summary>> {
    Ok(Json(report::get_summary(&state.db, today()).await?))
}

/// GET /api/names - previously entered person names, for input suggestions
pub async fn person_names(
    State(state): State<SharedState>,
    _ctx: AuthContext,
) -> Result<Json<Vec<String>>> {
    Ok(Json(record::person_names(&state.db).await?))
}

/// GET /api/departments
pub async fn departments(
    State(state): State<SharedState>,
    _ctx: AuthContext,
) -> Json<Vec<String>> {
    Json(state.config.departments.clone())
}

/// GET /api/users
pub async fn list_users(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<Vec<UserInfo>>> {
    Ok(Json(user::list_users(&state.db, &ctx).await?))
}

/// POST /api/users body
#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    /// New account name
    pub username: String,
    /// Initial password
    pub password: String,
    /// Defaults to a read-only account
    #[serde(default = "default_role")]
    pub role: Role,
}

const fn default_role() -> Role {
    Role::User
}

/// POST /api/users
pub async fn add_user(
    State(state): State<SharedState>,
    ctx: AuthContext,
    ApiJson(req): ApiJson<AddUserRequest>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    let created = user::add_user(&state.db, &ctx, &req.username, &req.password, req.role).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/users/{username}
pub async fn delete_user(
    State(state): State<SharedState>,
    ctx: AuthContext,
    ApiPath(username): ApiPath<String>,
) -> Result<StatusCode> {
    user::delete_user(&state.db, &ctx, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
