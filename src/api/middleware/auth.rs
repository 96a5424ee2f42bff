//! Admin authentication gate: bearer secret or session cookie.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Name of the session cookie set by `POST /api/login`.
pub const SESSION_COOKIE: &str = "auth_token";

/// Authorizes admin requests.
///
/// # Accepted Credentials
///
/// ```text
/// Authorization: Bearer <admin secret>
/// Cookie: auth_token=<session token>
/// ```
///
/// Either one is enough. Missing, expired and forged credentials all get the
/// same `401 {"error": "Authentication required."}`. Without a configured
/// admin secret every request is refused with 500 before any credential is
/// looked at.
///
/// Installed with `route_layer` so it runs before method matching: an
/// unauthenticated request with the wrong method gets 401, not 405.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let bearer = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token);
    let session = session_cookie(&parts.headers);

    st.auth.authorize(bearer.as_deref(), session.as_deref())?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Reads the session token from the `Cookie` header(s).
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

/// `Set-Cookie` value carrying a fresh session.
pub fn session_cookie_header(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session.
pub fn clear_session_cookie_header(secure: bool) -> String {
    session_cookie_header("", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=abc.def.ghi; lang=en"),
        );

        assert_eq!(session_cookie(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_session_cookie_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert!(session_cookie(&headers).is_none());

        headers.insert(COOKIE, HeaderValue::from_static("auth_token="));
        assert!(session_cookie(&headers).is_none());

        headers.insert(COOKIE, HeaderValue::from_static("xauth_token=abc"));
        assert!(session_cookie(&headers).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie_header("tok", 86400, true);
        assert_eq!(
            cookie,
            "auth_token=tok; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400; Secure"
        );

        let cleared = clear_session_cookie_header(false);
        assert!(cleared.starts_with("auth_token=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert!(!cleared.contains("Secure"));
    }
}
