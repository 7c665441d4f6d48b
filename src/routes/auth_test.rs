use super::*;
use axum::http::HeaderValue;

fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(name.clone(), HeaderValue::from_str(value).unwrap());
    }
    map
}

#[test]
fn no_credentials_yields_none() {
    assert_eq!(session_token(&HeaderMap::new()), None);
}

#[test]
fn bearer_token_is_used() {
    let h = headers(&[(header::AUTHORIZATION, "Bearer abc123")]);
    assert_eq!(session_token(&h).as_deref(), Some("abc123"));
}

#[test]
fn non_bearer_scheme_is_ignored() {
    let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
    assert_eq!(session_token(&h), None);
}

#[test]
fn cookie_is_fallback() {
    let h = headers(&[(header::COOKIE, "theme=night; session_token=cookie-tok")]);
    assert_eq!(session_token(&h).as_deref(), Some("cookie-tok"));
}

#[test]
fn bearer_wins_over_cookie() {
    let h = headers(&[(header::AUTHORIZATION, "Bearer from-header"), (header::COOKIE, "session_token=from-cookie")]);
    assert_eq!(session_token(&h).as_deref(), Some("from-header"));
}

#[test]
fn blank_bearer_falls_back_to_cookie() {
    let h = headers(&[(header::AUTHORIZATION, "Bearer   "), (header::COOKIE, "session_token=from-cookie")]);
    assert_eq!(session_token(&h).as_deref(), Some("from-cookie"));
}

#[test]
fn empty_cookie_is_ignored() {
    let h = headers(&[(header::COOKIE, "session_token=")]);
    assert_eq!(session_token(&h), None);
}
