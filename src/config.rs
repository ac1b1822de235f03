use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

/// Placeholder values shipped in the sample env file. Treated the same as
/// unset credentials so the app falls back to local storage.
const URL_PLACEHOLDER: &str = "YOUR_SUPABASE_URL_HERE";
const KEY_PLACEHOLDER: &str = "YOUR_SUPABASE_ANON_KEY_HERE";

pub struct Config {
    pub port: u16,
    pub secret_key: String,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub use_local_storage: bool,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("CREAMERY_PORT", "5000"),
            secret_key: try_load(
                "SECRET_KEY",
                "dev-secret-key-change-in-production-0000",
            ),
            supabase_url: credential("SUPABASE_URL", URL_PLACEHOLDER),
            supabase_key: credential("SUPABASE_KEY", KEY_PLACEHOLDER),
            use_local_storage: try_load("USE_LOCAL_STORAGE", "true"),
            data_dir: PathBuf::from(try_load::<String>("CREAMERY_DATA_DIR", "data")),
        }
    }

    /// Remote storage needs both credentials present and non-placeholder,
    /// and the local override off.
    pub fn remote_configured(&self) -> bool {
        !self.use_local_storage && self.supabase_url.is_some() && self.supabase_key.is_some()
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn credential(key: &str, placeholder: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() && value != placeholder => Some(value),
        Ok(_) => {
            info!("{key} is a placeholder, ignoring");
            None
        }
        Err(_) => None,
    }
}
