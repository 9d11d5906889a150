use records::{models::User, payloads::AuthResponse};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`, or nothing when the browser refuses access.
pub struct BrowserStorage(Option<web_sys::Storage>);

impl BrowserStorage {
    pub fn local() -> Self {
        Self(web_sys::window().and_then(|window| window.local_storage().ok().flatten()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.0 {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.0 {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Loading,
    Anonymous,
    Authenticated(Session),
}

/// Rebuilds the session from storage. Corrupted entries are wiped.
pub fn derive(store: &impl KeyValueStore) -> SessionState {
    let token = store.get(TOKEN_KEY).filter(|token| !token.is_empty());
    let user = store
        .get(USER_KEY)
        .filter(|user| !matches!(user.as_str(), "" | "undefined" | "null"));

    let (Some(token), Some(user)) = (token, user) else {
        return SessionState::Anonymous;
    };

    match serde_json::from_str::<User>(&user) {
        Ok(user) => SessionState::Authenticated(Session { token, user }),
        Err(_) => {
            clear(store);
            SessionState::Anonymous
        }
    }
}

pub fn persist(store: &impl KeyValueStore, session: &Session) {
    store.set(TOKEN_KEY, &session.token);

    if let Ok(user) = serde_json::to_string(&session.user) {
        store.set(USER_KEY, &user);
    }
}

pub fn clear(store: &impl KeyValueStore) {
    store.remove(TOKEN_KEY);
    store.remove(USER_KEY);
}
