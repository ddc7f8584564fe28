//! A stand-in API server for exercising the client over real HTTP.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use shared::{Envelope, Member};
use tokio::net::TcpListener;

use crate::api::ApiClient;

pub fn jane() -> Member {
    let joined = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    Member {
        id: 1,
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "555-1234".to_string(),
        membership_type: Default::default(),
        joining_date: joined,
        active: true,
        created_at: joined,
        updated_at: joined,
    }
}

fn merged(id: i64, body: &Value) -> Member {
    let mut member = Member { id, ..jane() };
    if let Some(name) = body["name"].as_str() {
        member.name = name.to_string();
    }
    if let Some(email) = body["email"].as_str() {
        member.email = email.to_string();
    }
    if let Some(phone) = body["phone"].as_str() {
        member.phone = phone.to_string();
    }
    if let Some(kind) = body["membershipType"].as_str().and_then(|s| s.parse().ok()) {
        member.membership_type = kind;
    }
    if let Some(active) = body["active"].as_bool() {
        member.active = active;
    }
    member
}

async fn list() -> Json<Envelope<Vec<Member>>> {
    Json(Envelope::list(vec![jane()]))
}

async fn get_one(Path(id): Path<i64>) -> Response {
    match id {
        404 => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": format!("Member with id {id} not found") })),
        )
            .into_response(),
        _ => Json(Envelope::data(Member { id, ..jane() })).into_response(),
    }
}

async fn create(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Failed to create member",
                "error": "A member with email taken@example.com already exists"
            })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(Envelope::data(merged(2, &body)).with_message("Member created successfully")),
    )
        .into_response()
}

async fn update(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Envelope<Member>> {
    Json(Envelope::data(merged(id, &body)).with_message("Member updated successfully"))
}

async fn remove(Path(id): Path<i64>) -> Response {
    match id {
        500 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => Json(Envelope::data(Member { id, ..jane() })).into_response(),
    }
}

/// Serves the stand-in on an ephemeral port and returns a client for it.
pub async fn spawn_api() -> ApiClient {
    let app = Router::new()
        .route("/api/members", get(list).post(create))
        .route("/api/members/{id}", get(get_one).put(update).delete(remove));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(reqwest::Client::new(), format!("http://{addr}"))
}
