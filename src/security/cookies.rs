// ABOUTME: Cookie helpers for the opaque session token
// ABOUTME: Builds Set-Cookie values with HttpOnly/Secure/SameSite and reads Cookie headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use clinic_core::constants::http_names::SESSION_COOKIE;
use http::{header, HeaderMap, HeaderValue};
use std::fmt::Write as _;
use tracing::warn;

/// `SameSite` attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Sent on same-site requests only
    Strict,
    /// Also sent on top-level cross-site navigations
    Lax,
}

/// Attributes of one `Set-Cookie` header
#[derive(Debug, Clone)]
pub struct SecureCookieConfig {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Lifetime in seconds; 0 expires the cookie
    pub max_age_secs: u64,
    /// Hide from scripts
    pub http_only: bool,
    /// Only send over HTTPS
    pub secure: bool,
    /// Cross-site policy
    pub same_site: SameSite,
}

impl SecureCookieConfig {
    /// `HttpOnly`, `Secure`, `SameSite=Strict` cookie
    #[must_use]
    pub const fn new(name: String, value: String, max_age_secs: u64) -> Self {
        Self {
            name,
            value,
            max_age_secs,
            http_only: true,
            secure: true,
            same_site: SameSite::Strict,
        }
    }

    /// Render the `Set-Cookie` value
    #[must_use]
    pub fn build(&self) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}",
            self.name, self.value, self.max_age_secs
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        let same_site = match self.same_site {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
        };
        let _ = write!(cookie, "; SameSite={same_site}");
        cookie
    }

    fn append_to(&self, headers: &mut HeaderMap) {
        match HeaderValue::from_str(&self.build()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(cookie = %self.name, "Cookie value is not a valid header: {e}"),
        }
    }
}

/// Set the session cookie
///
/// `SameSite=Lax` so that following a link into a guarded page keeps the session.
pub fn set_session_cookie(headers: &mut HeaderMap, token: &str, max_age_secs: u64, secure: bool) {
    let mut cookie = SecureCookieConfig::new(SESSION_COOKIE.to_owned(), token.to_owned(), max_age_secs);
    cookie.secure = secure;
    cookie.same_site = SameSite::Lax;
    cookie.append_to(headers);
}

/// Expire the session cookie
pub fn clear_session_cookie(headers: &mut HeaderMap, secure: bool) {
    set_session_cookie(headers, "", 0, secure);
}

/// Value of cookie `name` from the request's `Cookie` headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}
