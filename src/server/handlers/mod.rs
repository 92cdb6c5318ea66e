pub mod chat;
pub mod health;
pub mod history;
pub mod voice;

use axum::http::{header, HeaderMap};

pub(crate) const SESSION_COOKIE: &str = "session_id";

/// Session cookie lifetime, aligned with the 7-day history retention.
pub(crate) const SESSION_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Reads the session id from the request's cookies, if present.
pub(crate) fn session_from_cookies(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

pub(crate) fn session_cookie_header(session_id: &str) -> String {
    format!(
        "{}={}; HttpOnly; Max-Age={}; SameSite=Lax; Path=/",
        SESSION_COOKIE, session_id, SESSION_COOKIE_MAX_AGE_SECS
    )
}
