/*
 * Responsibility
 * - 環境変数や設定の読み込み (OPENID_*, CONTEXT_PATH)
 * - テストから差し替え可能な設定ソース (Settings)
 */
use std::collections::HashMap;

/// Environment variable names read by the OpenID backend.
pub mod keys {
    pub const AUTH_URL: &str = "OPENID_AUTH_URL";
    pub const TOKEN_URL: &str = "OPENID_TOKEN_URL";
    pub const JWKS_URL: &str = "OPENID_JWKS_URL";
    pub const CLIENT_ID: &str = "OPENID_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "OPENID_CLIENT_SECRET";
    pub const USERNAME_ATTRIBUTE: &str = "OPENID_USERNAME_ATTRIBUTE";
    pub const ROLES_CLAIM: &str = "OPENID_ROLES_CLAIM";
    pub const LOGOUT_URL: &str = "OPENID_LOGOUT_URL";
    pub const CONTEXT_PATH: &str = "CONTEXT_PATH";

    /// Indexed scope keys: OPENID_SCOPES_0, OPENID_SCOPES_1, ...
    pub fn scope(index: usize) -> String {
        format!("OPENID_SCOPES_{index}")
    }
}

/// Immutable snapshot of the raw configuration source.
///
/// Built once at startup from the process environment; tests build one with
/// `from_iter` instead of mutating process state.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            values: std::env::vars().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the raw value only if it is present and not blank.
    pub fn get_nonblank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Context path podproxy is mounted under, normalized to a single leading `/`
/// and, per `with_trailing_slash`, exactly one trailing `/` or none.
///
/// Unset or blank means the server root: `""` (or `"/"` with the flag set).
pub fn context_path(settings: &Settings, with_trailing_slash: bool) -> String {
    let configured = match settings.get_nonblank(keys::CONTEXT_PATH) {
        Some(path) => path.trim(),
        None => return if with_trailing_slash { "/".into() } else { String::new() },
    };

    let trimmed = configured.trim_matches('/');
    if trimmed.is_empty() {
        return if with_trailing_slash { "/".into() } else { String::new() };
    }

    if with_trailing_slash {
        format!("/{trimmed}/")
    } else {
        format!("/{trimmed}")
    }
}
