//! Event endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use daybook_core::{Event, EventId, EventSummary};
use serde::Serialize;

use crate::routes::AppError;
use crate::routes::auth::AuthUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", post(save_event))
        .route("/events/{year}/{month}/{day}", get(list_day))
        .route(
            "/events/{year}/{month}/{day}/{id}",
            get(get_event).delete(delete_event),
        )
}

fn bucket_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {year}-{month}-{day}")))
}

#[derive(Serialize)]
pub struct SavedEvent {
    pub id: EventId,
}

/// POST /events - Create or overwrite an event
async fn save_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(event): Json<Event>,
) -> Result<Json<SavedEvent>, AppError> {
    let id = state.store().save_event(&event, &user)?;
    Ok(Json(SavedEvent { id }))
}

/// GET /events/:year/:month/:day - Summaries of one day's events
async fn list_day(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((year, month, day)): Path<(i32, u32, u32)>,
) -> Result<Json<Vec<EventSummary>>, AppError> {
    let date = bucket_date(year, month, day)?;
    state
        .store()
        .get_events(date, &user)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No events recorded for {date}")))
}

/// GET /events/:year/:month/:day/:id - One full event
async fn get_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((year, month, day, id)): Path<(i32, u32, u32, EventId)>,
) -> Result<Json<Event>, AppError> {
    let date = bucket_date(year, month, day)?;
    state
        .store()
        .get_event(date, id, &user)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Event {id} not found on {date}")))
}

/// DELETE /events/:year/:month/:day/:id - Remove an event if present
async fn delete_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((year, month, day, id)): Path<(i32, u32, u32, EventId)>,
) -> Result<StatusCode, AppError> {
    let date = bucket_date(year, month, day)?;
    state.store().delete_event(date, id, &user)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{TestServer, json};
    use axum::http::Method;
    use serde_json::json;

    const ALICE: Option<(&str, &str)> = Some(("alice", "pw1"));

    fn standup(day: u32) -> serde_json::Value {
        json!({
            "name": "standup",
            "beginning": format!("2024-03-{day:02}T09:00:00"),
            "end": format!("2024-03-{day:02}T09:15:00"),
            "place": "room 4",
        })
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;

        let saved = server
            .send(Method::POST, "/events", ALICE, Some(standup(5)))
            .await;
        assert_eq!(saved.status(), 200);
        assert_eq!(json(saved).await["id"], 0);

        let fetched = server.send(Method::GET, "/events/2024/3/5/0", ALICE, None).await;
        assert_eq!(fetched.status(), 200);
        let event = json(fetched).await;
        assert_eq!(event["id"], 0);
        assert_eq!(event["name"], "standup");
        assert_eq!(event["place"], "room 4");
        assert_eq!(event["description"], "");
    }

    #[tokio::test]
    async fn test_list_day_empty_vs_missing() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;

        let missing = server.send(Method::GET, "/events/2024/3/5", ALICE, None).await;
        assert_eq!(missing.status(), 404);

        server.send(Method::POST, "/events", ALICE, Some(standup(5))).await;
        let listed = server.send(Method::GET, "/events/2024/3/5", ALICE, None).await;
        assert_eq!(listed.status(), 200);
        assert_eq!(json(listed).await.as_array().unwrap().len(), 1);

        let deleted = server
            .send(Method::DELETE, "/events/2024/3/5/0", ALICE, None)
            .await;
        assert_eq!(deleted.status(), 204);

        let emptied = server.send(Method::GET, "/events/2024/3/5", ALICE, None).await;
        assert_eq!(emptied.status(), 200);
        assert_eq!(json(emptied).await, json!([]));
    }

    #[tokio::test]
    async fn test_delete_missing_is_no_content() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;

        let response = server
            .send(Method::DELETE, "/events/2024/3/5/42", ALICE, None)
            .await;
        assert_eq!(response.status(), 204);
    }

    #[tokio::test]
    async fn test_get_missing_event_is_404() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;

        let response = server.send(Method::GET, "/events/2024/3/5/0", ALICE, None).await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_invalid_event_is_bad_request() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;

        let backwards = json!({
            "name": "standup",
            "beginning": "2024-03-05T10:00:00",
            "end": "2024-03-05T09:00:00",
        });
        let response = server.send(Method::POST, "/events", ALICE, Some(backwards)).await;
        assert_eq!(response.status(), 400);

        let mut unissued = standup(5);
        unissued["id"] = json!(7);
        let response = server.send(Method::POST, "/events", ALICE, Some(unissued)).await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_saved_id_cannot_move_to_another_day() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;
        server.send(Method::POST, "/events", ALICE, Some(standup(5))).await;

        let mut moved = standup(6);
        moved["id"] = json!(0);
        moved["name"] = json!("retro");
        let response = server.send(Method::POST, "/events", ALICE, Some(moved)).await;
        assert_eq!(response.status(), 400);

        let missing = server.send(Method::GET, "/events/2024/3/6", ALICE, None).await;
        assert_eq!(missing.status(), 404);
        let kept = json(server.send(Method::GET, "/events/2024/3/5/0", ALICE, None).await).await;
        assert_eq!(kept["name"], "standup");
    }

    #[tokio::test]
    async fn test_io_failure_hides_details() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;
        std::fs::write(server.dir.path().join("alice/2024"), "not a directory").unwrap();

        let response = server.send(Method::POST, "/events", ALICE, Some(standup(5))).await;
        assert_eq!(response.status(), 500);
        let body = json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_impossible_date_is_bad_request() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;

        let response = server.send(Method::GET, "/events/2024/2/30", ALICE, None).await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let server = TestServer::new();
        server.register("alice", "pw1").await;
        server.register("bob", "pw2").await;
        server.send(Method::POST, "/events", ALICE, Some(standup(5))).await;

        let response = server
            .send(Method::GET, "/events/2024/3/5/0", Some(("bob", "pw2")), None)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_events_require_auth() {
        let server = TestServer::new();
        let response = server.send(Method::POST, "/events", None, Some(standup(5))).await;
        assert_eq!(response.status(), 401);
    }
}
