//! Session cookie signing and `Set-Cookie` header values.
//!
//! The cookie carries `{session_id}.{hex hmac-sha256(session_id)}` so a
//! client cannot forge or alter a session id.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::SessionConfig;
use crate::SecretString;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(key: &SecretString) -> HmacSha256 {
    // HMAC accepts keys of any length
    #[allow(clippy::expect_used)]
    HmacSha256::new_from_slice(key.expose_secret().as_bytes()).expect("HMAC accepts any key size")
}

/// Returns `{session_id}.{signature}`.
pub fn sign_session_id(session_id: &str, secret: &SecretString) -> String {
    let mut mac = mac_for(secret);
    mac.update(session_id.as_bytes());
    format!(
        "{session_id}.{}",
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Extracts the session id from a signed cookie value, or `None` if the
/// signature does not match.
pub fn verify_signed_cookie(cookie_value: &str, secret: &SecretString) -> Option<String> {
    let (session_id, signature_hex) = cookie_value.rsplit_once('.')?;
    let signature = hex::decode(signature_hex).ok()?;

    let mut mac = mac_for(secret);
    mac.update(session_id.as_bytes());
    if mac.verify_slice(&signature).is_ok() {
        Some(session_id.to_owned())
    } else {
        log::warn!(target: "orgbook::session", "msg=\"session cookie tampered\", cookie_prefix=\"{}...\"", cookie_value.chars().take(8).collect::<String>());
        None
    }
}

/// Finds the value of cookie `name` in a `Cookie` request header.
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// `Set-Cookie` value carrying a signed session id.
pub fn session_cookie(signed_value: &str, config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}={signed_value}; Path={}; Max-Age={}; SameSite={}",
        config.cookie_name,
        config.cookie_path,
        config.session_lifetime.num_seconds(),
        config.cookie_same_site.as_str()
    );
    if let Some(domain) = &config.cookie_domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if config.cookie_http_only {
        cookie.push_str("; HttpOnly");
    }
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn removal_cookie(config: &SessionConfig) -> String {
    format!(
        "{}=; Path={}; Max-Age=0",
        config.cookie_name, config.cookie_path
    )
}
