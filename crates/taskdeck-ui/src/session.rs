use gloo::storage::{LocalStorage, Storage};

const TOKEN_KEY: &str = "token";
const EMAIL_KEY: &str = "email";
const USERNAME_KEY: &str = "username";

/// Snapshot of the persisted session. Presence of the token is the
/// whole authentication check; the token itself is never validated
/// client-side, so a stale one simply makes follow-on requests fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub username: String,
}

fn get_raw(key: &str) -> Option<String> {
    LocalStorage::raw().get_item(key).ok().flatten()
}

fn set_raw(key: &str, value: &str) {
    let _ = LocalStorage::raw().set_item(key, value);
}

fn remove_raw(key: &str) {
    let _ = LocalStorage::raw().remove_item(key);
}

/// Re-derives the session from local storage. Called on every
/// protected-route render rather than cached, matching the auth gate's
/// token-presence semantics.
pub fn load() -> Option<Session> {
    let token = get_raw(TOKEN_KEY)?;
    if token.is_empty() {
        return None;
    }
    Some(Session {
        token,
        email: get_raw(EMAIL_KEY).unwrap_or_default(),
        username: get_raw(USERNAME_KEY).unwrap_or_default(),
    })
}

pub fn save(token: &str, email: &str, username: &str) {
    set_raw(TOKEN_KEY, token);
    set_raw(EMAIL_KEY, email);
    set_raw(USERNAME_KEY, username);
    tracing::debug!(%email, "persisted session");
}

pub fn clear() {
    remove_raw(TOKEN_KEY);
    remove_raw(EMAIL_KEY);
    remove_raw(USERNAME_KEY);
    tracing::debug!("cleared session");
}
