/*
 * Responsibility
 * - OpenID Connect バックエンドの facade (AuthenticationBackend 実装)
 * - client / roles / session / env の合成とプロトコル層への配線
 */
pub mod client;
pub mod env;
pub mod roles;
pub mod session;

pub use client::{ClientConfig, ClientRegistry, GrantType, REGISTRATION_ID};
pub use env::ENV_TOKEN_NAME;
pub use roles::RoleMapper;
pub use session::{AuthorizedSession, AuthorizedSessionStore};

use std::sync::Arc;

use crate::backend::{AuthenticationBackend, DEFAULT_LOGOUT_SUCCESS_URL, SecurityPipeline};
use crate::config::{Settings, context_path, keys};
use crate::error::ConfigError;
use crate::principal::Principal;

/// Backend identifier, matched against the configured authentication mode.
pub const NAME: &str = "openid";

/// Login page the security pipeline redirects unauthenticated users to.
const LOGIN_PAGE: &str = "/login";

/// Path prefix under which the protocol layer serves authorization-request
/// redirects, one sub-path per registration id.
const AUTHORIZATION_REQUEST_BASE_PATH: &str = "/oauth2/authorization";

/// The OpenID Connect authentication backend.
///
/// Owns the resolved client registry, the authorized-session store, and the
/// role mapper; the external protocol layer receives all three through
/// `configure_security` and populates the store after each completed login.
pub struct OpenIdAuthenticationBackend {
    clients: Arc<ClientRegistry>,
    sessions: Arc<AuthorizedSessionStore>,
    role_mapper: RoleMapper,
    context_path: String,
    logout_url: Option<String>,
}

impl OpenIdAuthenticationBackend {
    /// Resolves the client configuration and builds the backend. Fails when a
    /// required OPENID_* key is missing so the process refuses to start in a
    /// broken state.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let clients = Arc::new(ClientRegistry::resolve(settings)?);

        Ok(Self {
            clients,
            sessions: Arc::new(AuthorizedSessionStore::new()),
            role_mapper: RoleMapper::from_settings(settings),
            context_path: context_path(settings, false),
            logout_url: settings.get_nonblank(keys::LOGOUT_URL).map(str::to_string),
        })
    }

    pub fn client_registry(&self) -> Arc<ClientRegistry> {
        Arc::clone(&self.clients)
    }

    pub fn session_store(&self) -> Arc<AuthorizedSessionStore> {
        Arc::clone(&self.sessions)
    }
}

impl AuthenticationBackend for OpenIdAuthenticationBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn has_authorization(&self) -> bool {
        true
    }

    fn configure_security(&self, pipeline: &mut dyn SecurityPipeline) {
        pipeline.require_authentication();
        pipeline.set_login_page(LOGIN_PAGE);
        pipeline.enable_oauth2_login(
            Arc::clone(&self.clients),
            Arc::clone(&self.sessions),
            self.role_mapper.clone(),
        );
    }

    fn login_redirect_uri(&self) -> String {
        format!(
            "{}{}/{}",
            self.context_path, AUTHORIZATION_REQUEST_BASE_PATH, REGISTRATION_ID
        )
    }

    fn logout_success_url(&self) -> String {
        self.logout_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGOUT_SUCCESS_URL.to_string())
    }

    fn customize_container_env(&self, principal: Option<&Principal>, env: &mut Vec<String>) {
        env::append_access_token(&self.sessions, REGISTRATION_ID, principal, env);
    }
}
