//! HTTP transport for communicating with daybook-server

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use daybook_core::{Event, EventId, EventSummary, Transport, TransportError, User};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to a daybook-server over HTTP, one request per operation
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

// Request and response bodies matching the server API

#[derive(Serialize)]
struct Credentials<'a> {
    name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct NewName<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct NewPassword<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct SavedEvent {
    id: EventId,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(server_url).with_context(|| format!("Invalid server URL: {server_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid server URL: {server_url}");
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpTransport { http, base_url })
    }

    fn url(&self, segments: &[String]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn day_segments(date: NaiveDate) -> Vec<String> {
        vec![
            "events".to_string(),
            date.year().to_string(),
            date.month().to_string(),
            date.day().to_string(),
        ]
    }

    fn event_segments(date: NaiveDate, id: EventId) -> Vec<String> {
        let mut segments = Self::day_segments(date);
        segments.push(id.to_string());
        segments
    }

    fn authed(&self, request: RequestBuilder, user: &User) -> RequestBuilder {
        request.basic_auth(&user.name, Some(&user.password))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request
            .send()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        tracing::debug!(url = %response.url(), status = %response.status(), "response");
        Ok(response)
    }
}

/// The error for a response the caller has no specific handling for.
fn error_for(response: Response) -> TransportError {
    let status = response.status();
    let message = response
        .json::<ErrorResponse>()
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());
    status_error(status, message)
}

fn status_error(status: StatusCode, message: String) -> TransportError {
    match status {
        StatusCode::UNAUTHORIZED => TransportError::Unauthorized,
        s if s.is_client_error() => TransportError::BadRequest(message),
        _ => TransportError::Internal(message),
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    response
        .json()
        .map_err(|e| TransportError::Internal(format!("Unreadable server response: {e}")))
}

impl Transport for HttpTransport {
    /// POST /users
    fn create_user(&self, user: &User) -> Result<bool, TransportError> {
        let body = Credentials {
            name: &user.name,
            password: &user.password,
        };
        let response = self.send(self.http.post(self.url(&["users".into()])).json(&body))?;

        match response.status() {
            StatusCode::CONFLICT => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(error_for(response)),
        }
    }

    /// GET /login
    fn authenticate(&self, user: &User) -> Result<bool, TransportError> {
        let request = self.authed(self.http.get(self.url(&["login".into()])), user);
        let response = self.send(request)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(error_for(response)),
        }
    }

    /// POST /events
    fn save_event(&self, user: &User, event: &Event) -> Result<EventId, TransportError> {
        let request = self.authed(self.http.post(self.url(&["events".into()])), user);
        let response = self.send(request.json(event))?;

        if !response.status().is_success() {
            return Err(error_for(response));
        }
        Ok(read_json::<SavedEvent>(response)?.id)
    }

    /// DELETE /events/:year/:month/:day/:id
    fn delete_event(&self, user: &User, date: NaiveDate, id: EventId) -> Result<(), TransportError> {
        let url = self.url(&Self::event_segments(date, id));
        let response = self.send(self.authed(self.http.delete(url), user))?;

        if !response.status().is_success() {
            return Err(error_for(response));
        }
        Ok(())
    }

    /// GET /events/:year/:month/:day/:id
    fn get_event(
        &self,
        user: &User,
        date: NaiveDate,
        id: EventId,
    ) -> Result<Option<Event>, TransportError> {
        let url = self.url(&Self::event_segments(date, id));
        let response = self.send(self.authed(self.http.get(url), user))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => read_json(response).map(Some),
            _ => Err(error_for(response)),
        }
    }

    /// GET /events/:year/:month/:day
    fn get_events(
        &self,
        user: &User,
        date: NaiveDate,
    ) -> Result<Option<Vec<EventSummary>>, TransportError> {
        let url = self.url(&Self::day_segments(date));
        let response = self.send(self.authed(self.http.get(url), user))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => read_json(response).map(Some),
            _ => Err(error_for(response)),
        }
    }

    /// PUT /users/me/name
    fn change_user_name(&self, old: &User, new: &User) -> Result<bool, TransportError> {
        let url = self.url(&["users".into(), "me".into(), "name".into()]);
        let request = self.authed(self.http.put(url), old).json(&NewName { name: &new.name });
        let response = self.send(request)?;

        match response.status() {
            StatusCode::CONFLICT => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(error_for(response)),
        }
    }

    /// PUT /users/me/password
    fn change_password(&self, old: &User, new: &User) -> Result<(), TransportError> {
        let url = self.url(&["users".into(), "me".into(), "password".into()]);
        let body = NewPassword {
            password: &new.password,
        };
        let response = self.send(self.authed(self.http.put(url), old).json(&body))?;

        if !response.status().is_success() {
            return Err(error_for(response));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_event_url_is_unpadded() {
        let transport = HttpTransport::new("http://127.0.0.1:8080").unwrap();
        let url = transport.url(&HttpTransport::event_segments(day(), 12));
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/events/2024/3/5/12");
    }

    #[test]
    fn test_base_path_is_kept() {
        let transport = HttpTransport::new("https://example.com/daybook/").unwrap();
        let url = transport.url(&HttpTransport::day_segments(day()));
        assert_eq!(url.as_str(), "https://example.com/daybook/events/2024/3/5");
    }

    #[test]
    fn test_rejects_unusable_url() {
        assert!(HttpTransport::new("not a url").is_err());
        assert!(HttpTransport::new("mailto:alice@example.com").is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            TransportError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "bad".into()),
            TransportError::BadRequest(m) if m == "bad"
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "corrupt".into()),
            TransportError::Internal(_)
        ));
    }

    #[test]
    fn test_unreachable_server_is_unavailable() {
        // Nothing listens on port 1
        let transport = HttpTransport::new("http://127.0.0.1:1").unwrap();
        let result = transport.get_events(&User::new("alice", "pw1"), day());
        assert!(matches!(result, Err(TransportError::Unavailable(_))));
    }
}
