//! Session cookie parsing and `Set-Cookie` construction.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;

pub const SESSION_COOKIE: &str = "filmbase_session";

/// Attributes applied to the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age_secs: i64,
}

/// Extract the session token from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that stores `token`.
pub fn session_cookie(token: &str, settings: &CookieSettings) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        settings.max_age_secs.max(0),
        if settings.secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie(settings: &CookieSettings) -> String {
    format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        if settings.secure { "; Secure" } else { "" }
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn finds_token_among_other_cookies() {
        let h = headers(&["theme=dark; filmbase_session=abc123; lang=en"]);
        assert_eq!(session_token(&h).as_deref(), Some("abc123"));
    }

    #[test]
    fn finds_token_in_second_header() {
        let h = headers(&["theme=dark", "filmbase_session=xyz"]);
        assert_eq!(session_token(&h).as_deref(), Some("xyz"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(session_token(&headers(&[])), None);
        assert_eq!(session_token(&headers(&["filmbase_session="])), None);
        assert_eq!(session_token(&headers(&["other_session=abc"])), None);
    }

    #[test]
    fn cookie_attributes() {
        let settings = CookieSettings {
            secure: true,
            max_age_secs: 60,
        };
        let set = session_cookie("tok", &settings);
        assert!(set.starts_with("filmbase_session=tok;"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Max-Age=60"));
        assert!(set.ends_with("; Secure"));

        let plain = CookieSettings {
            secure: false,
            ..settings
        };
        assert!(!clear_cookie(&plain).contains("Secure"));
        assert!(clear_cookie(&plain).contains("Max-Age=0"));
    }
}
