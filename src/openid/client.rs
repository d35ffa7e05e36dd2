use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{Settings, keys};
use crate::error::ConfigError;

/// Registration id of the single OIDC client podproxy runs with.
pub const REGISTRATION_ID: &str = "podproxy";

/// Callback URL template the protocol layer expands per deployment.
pub const REDIRECT_URI_TEMPLATE: &str = "{baseUrl}/login/oauth2/code/{registrationId}";

const DEFAULT_USERNAME_ATTRIBUTE: &str = "email";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantType {
    AuthorizationCode,
}

/// Resolved OAuth2/OIDC client configuration. Built once at startup,
/// immutable afterwards.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub registration_id: String,
    pub grant_type: GrantType,
    pub redirect_uri_template: String,
    pub scopes: BTreeSet<String>,
    pub username_attribute: String,
    pub authorization_uri: String,
    pub token_uri: String,
    pub jwks_uri: Option<String>,
    pub client_id: String,
    pub client_secret: String,
}

// Keep the client secret out of log output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("registration_id", &self.registration_id)
            .field("grant_type", &self.grant_type)
            .field("redirect_uri_template", &self.redirect_uri_template)
            .field("scopes", &self.scopes)
            .field("username_attribute", &self.username_attribute)
            .field("authorization_uri", &self.authorization_uri)
            .field("token_uri", &self.token_uri)
            .field("jwks_uri", &self.jwks_uri)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl ClientConfig {
    fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            registration_id: REGISTRATION_ID.to_string(),
            grant_type: GrantType::AuthorizationCode,
            redirect_uri_template: REDIRECT_URI_TEMPLATE.to_string(),
            scopes: resolve_scopes(settings),
            username_attribute: settings
                .get(keys::USERNAME_ATTRIBUTE)
                .unwrap_or(DEFAULT_USERNAME_ATTRIBUTE)
                .to_string(),
            authorization_uri: require(settings, keys::AUTH_URL)?,
            token_uri: require(settings, keys::TOKEN_URL)?,
            jwks_uri: settings.get(keys::JWKS_URL).map(str::to_string),
            client_id: require(settings, keys::CLIENT_ID)?,
            client_secret: require(settings, keys::CLIENT_SECRET)?,
        })
    }
}

/// `openid` and `email` plus configured extras. The indexed scan stops at the
/// first missing index; a gap truncates the list even if higher indices are
/// set.
fn resolve_scopes(settings: &Settings) -> BTreeSet<String> {
    let mut scopes = BTreeSet::new();
    scopes.insert("openid".to_string());
    scopes.insert("email".to_string());

    for index in 0.. {
        match settings.get(&keys::scope(index)) {
            Some(scope) => scopes.insert(scope.to_string()),
            None => break,
        };
    }

    scopes
}

fn require(settings: &Settings, key: &'static str) -> Result<String, ConfigError> {
    settings
        .get_nonblank(key)
        .map(str::to_string)
        .ok_or(ConfigError::Missing(key))
}

/// Holds the single resolved client registration, shared read-only with the
/// external protocol layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientRegistry {
    client: ClientConfig,
}

impl ClientRegistry {
    pub fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            client: ClientConfig::resolve(settings)?,
        })
    }

    pub fn find(&self, registration_id: &str) -> Option<&ClientConfig> {
        (self.client.registration_id == registration_id).then_some(&self.client)
    }

    /// The one registration this backend runs with.
    pub fn single(&self) -> &ClientConfig {
        &self.client
    }
}
