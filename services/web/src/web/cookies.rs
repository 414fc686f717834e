//! services/web/src/web/cookies.rs
//!
//! Reading the `Cookie` header and building `Set-Cookie` values.

use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// Returns the value of cookie `name`, looking through every `Cookie` header.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            let (key, value) = c.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// A cookie without `Max-Age`, so the browser drops it when it closes.
pub fn session_cookie(session_id: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, session_id);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn flash_cookie(code: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", FLASH_COOKIE, code)
}

/// Tells the browser to forget cookie `name`.
pub fn expired_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; flash=upload_ok"),
        );
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("abc-123"));
        assert_eq!(read_cookie(&headers, FLASH_COOKIE), Some("upload_ok"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn prefix_of_another_name_does_not_match() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sessionx=nope"));
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), None);
    }

    #[test]
    fn secure_flag_is_optional() {
        assert!(!session_cookie("id", false).contains("Secure"));
        assert!(session_cookie("id", true).ends_with("; Secure"));
    }
}
