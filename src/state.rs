use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use minijinja::Environment;
use tracing::{info, warn};

use crate::{
    config::Config,
    store::{LocalBackend, RemoteBackend, StorageBackend, Store, SEED_FLAVORS},
    templates,
};

/// Shared application state. Cloned per request by the router, so the
/// heavier pieces sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub templates: Arc<Environment<'static>>,
    key: Key,
}

impl AppState {
    pub fn new() -> Self {
        let config = Config::load();

        assert!(
            config.secret_key.len() >= 32,
            "SECRET_KEY must be at least 32 bytes"
        );
        let key = Key::derive_from(config.secret_key.as_bytes());

        let store = Store::new(select_backend(&config));

        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            templates: Arc::new(templates::environment()),
            key,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Remote storage when credentials are real, local JSON files otherwise.
/// A remote client that cannot even be constructed falls back to local too.
fn select_backend(config: &Config) -> Box<dyn StorageBackend> {
    if config.remote_configured() {
        let url = config.supabase_url.as_deref().unwrap_or_default();
        let key = config.supabase_key.as_deref().unwrap_or_default();

        match RemoteBackend::new(url, key) {
            Ok(backend) => {
                info!("Connected to Supabase");
                return Box::new(backend);
            }
            Err(e) => {
                warn!("Could not set up Supabase client, falling back to local storage: {e}");
            }
        }
    } else {
        info!("Using local storage mode (Supabase not configured)");
    }

    Box::new(
        LocalBackend::init(&config.data_dir, &SEED_FLAVORS).expect("Local storage misconfigured!"),
    )
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_signing_key_extractable_from_state() {
        let dir = TempDir::new().unwrap();

        let config = Config {
            port: 0,
            secret_key: "0123456789abcdef0123456789abcdef".to_string(),
            supabase_url: None,
            supabase_key: None,
            use_local_storage: true,
            data_dir: dir.path().to_path_buf(),
        };

        let backend = LocalBackend::init(&config.data_dir, &SEED_FLAVORS).unwrap();
        let state = AppState {
            key: Key::derive_from(config.secret_key.as_bytes()),
            config: Arc::new(config),
            store: Arc::new(Store::new(Box::new(backend))),
            templates: Arc::new(templates::environment()),
        };

        let extracted = Key::from_ref(&state);
        let cloned = state.clone();

        assert_eq!(extracted.signing(), cloned.key.signing());
    }
}
