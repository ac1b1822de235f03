//! One-shot flash messages carried in a signed cookie: set on a POST
//! redirect, consumed by the next page render.

use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "creamery_flash";

#[derive(Debug, Serialize, Deserialize)]
pub struct Flash {
    pub level: String,
    pub text: String,
}

pub fn success(jar: SignedCookieJar, text: impl Into<String>) -> SignedCookieJar {
    set(jar, "success", text.into())
}

pub fn error(jar: SignedCookieJar, text: impl Into<String>) -> SignedCookieJar {
    set(jar, "error", text.into())
}

fn set(jar: SignedCookieJar, level: &str, text: String) -> SignedCookieJar {
    let flash = Flash {
        level: level.to_string(),
        text,
    };

    match serde_json::to_string(&flash) {
        Ok(value) => jar.add(Cookie::build((FLASH_COOKIE, value)).path("/").build()),
        Err(_) => jar,
    }
}

/// Pops the pending flash, if any. Returns the jar with the cookie removed
/// so the message shows exactly once.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let flash = serde_json::from_str(cookie.value()).ok();
            let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
            (jar, flash)
        }
        None => (jar, None),
    }
}
