mod repository;
mod validation;

pub use repository::*;
pub use validation::*;

use axum::{
    debug_handler,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Envelope, Member};

use crate::error::{AppError, AppResult, OnFailure};
use crate::AppState;

/// Request body for both create and update; absent fields are left to the
/// defaults (create) or to the stored values (update).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// Ids that don't parse can't name a row, same as an id with no row.
fn parse_id(raw: String) -> AppResult<i64> {
    raw.trim().parse().map_err(|_| AppError::UnknownId(raw))
}

fn json_body(
    payload: Result<Json<MemberFields>, JsonRejection>,
    action: &'static str,
) -> AppResult<MemberFields> {
    payload
        .map(|Json(fields)| fields)
        .map_err(|rejection| AppError::BadRequest {
            action,
            reason: rejection.body_text(),
        })
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(members))]
pub async fn get_members(
    State(members): State<MemberRepository>,
) -> AppResult<Json<Envelope<Vec<Member>>>> {
    let all = members
        .list_all()
        .await
        .on_failure("Failed to fetch members")?;

    Ok(Json(Envelope::list(all)))
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(members))]
pub async fn get_member_by_id(
    State(members): State<MemberRepository>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<Member>>> {
    let id = parse_id(id)?;
    let member = members
        .get_by_id(id)
        .await
        .on_failure("Failed to fetch member")?;

    Ok(Json(Envelope::data(member)))
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(members, payload))]
pub async fn create_member(
    State(members): State<MemberRepository>,
    payload: Result<Json<MemberFields>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    const ACTION: &str = "Failed to create member";
    let fields = json_body(payload, ACTION)?;
    let member = members.create(fields).await.on_failure(ACTION)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(member).with_message("Member created successfully")),
    ))
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(members, payload))]
pub async fn update_member(
    State(members): State<MemberRepository>,
    Path(id): Path<String>,
    payload: Result<Json<MemberFields>, JsonRejection>,
) -> AppResult<Json<Envelope<Member>>> {
    const ACTION: &str = "Failed to update member";
    let id = parse_id(id)?;
    let fields = json_body(payload, ACTION)?;
    let member = members.update(id, fields).await.on_failure(ACTION)?;

    Ok(Json(
        Envelope::data(member).with_message("Member updated successfully"),
    ))
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(members))]
pub async fn delete_member(
    State(members): State<MemberRepository>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<Member>>> {
    let id = parse_id(id)?;
    let member = members
        .delete(id)
        .await
        .on_failure("Failed to delete member")?;

    Ok(Json(
        Envelope::data(member).with_message("Member deleted successfully"),
    ))
}
