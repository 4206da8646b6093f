use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::session_store::{NewSession, Realm};

/// Attaches the three `__Host-`-prefixed cookies (§4.2, §6) for a freshly
/// created session. `__Host-` requires `Secure`, `Path=/`, and no `Domain`
/// attribute, which also rules out subdomain replay.
pub fn attach_session_cookies(jar: CookieJar, realm: Realm, session: &NewSession, max_age_seconds: i64) -> CookieJar {
    let prefix = realm.cookie_prefix();
    let httponly = |name: String, value: String| {
        Cookie::build((name, value))
            .path("/")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(max_age_seconds))
            .build()
    };
    // The CSRF cookie is deliberately readable by JS: the browser client
    // mirrors its value into the `x-csrf-token` header on mutating
    // requests (double-submit pattern), which only works if it isn't
    // `HttpOnly`.
    let readable = |name: String, value: String| {
        Cookie::build((name, value))
            .path("/")
            .secure(true)
            .http_only(false)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(max_age_seconds))
            .build()
    };
    jar.add(httponly(prefix.to_string(), session.session_id.clone()))
        .add(httponly(format!("{prefix}-Refresh"), session.refresh_token.clone()))
        .add(readable(format!("{prefix}-Csrf"), session.csrf_token.clone()))
}

pub fn clear_session_cookies(jar: CookieJar, realm: Realm) -> CookieJar {
    let prefix = realm.cookie_prefix();
    let expire = |name: String| {
        Cookie::build((name, ""))
            .path("/")
            .secure(true)
            .max_age(time::Duration::seconds(0))
            .build()
    };
    jar.add(expire(prefix.to_string()))
        .add(expire(format!("{prefix}-Refresh")))
        .add(expire(format!("{prefix}-Csrf")))
}
