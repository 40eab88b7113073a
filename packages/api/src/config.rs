//! Environment overlay for [`NotebookConfig`].
//!
//! Native builds read the process environment (after loading `.env` with
//! `dotenvy`); browser builds have no environment at runtime and use the
//! values present when the bundle was compiled.

use store::config::ConfigError;
use store::NotebookConfig;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const REDIRECT_VAR: &str = "NOTEBOOK_REDIRECT_TO";

/// Override config values with any of the variables that are set.
pub fn apply_env(config: &mut NotebookConfig) {
    #[cfg(not(target_arch = "wasm32"))]
    dotenvy::dotenv().ok();

    if let Some(url) = env_value(URL_VAR) {
        config.backend.url = url;
    }
    if let Some(key) = env_value(ANON_KEY_VAR) {
        config.backend.anon_key = key;
    }
    if let Some(redirect_to) = env_value(REDIRECT_VAR) {
        config.auth.redirect_to = Some(redirect_to);
    }
}

/// Parse `toml`, apply the environment and validate the result.
pub fn load(toml: &str) -> Result<NotebookConfig, ConfigError> {
    let mut config = NotebookConfig::from_toml(toml)?;
    apply_env(&mut config);
    config.validate()?;
    Ok(config)
}

#[cfg(not(target_arch = "wasm32"))]
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn env_value(name: &str) -> Option<String> {
    let value = match name {
        URL_VAR => option_env!("SUPABASE_URL"),
        ANON_KEY_VAR => option_env!("SUPABASE_ANON_KEY"),
        REDIRECT_VAR => option_env!("NOTEBOOK_REDIRECT_TO"),
        _ => None,
    };
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_file() {
        std::env::set_var(URL_VAR, "https://fromenv.supabase.co");
        std::env::set_var(ANON_KEY_VAR, "env-key");
        std::env::remove_var(REDIRECT_VAR);

        let config = load(
            r#"
            [backend]
            url = "https://fromfile.supabase.co"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.url, "https://fromenv.supabase.co");
        assert_eq!(config.backend.anon_key, "env-key");
        assert!(config.auth.redirect_to.is_none());
    }
}
