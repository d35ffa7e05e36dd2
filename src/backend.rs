/*
 * Responsibility
 * - 認証バックエンド共通の facade trait (AuthenticationBackend)
 * - 外部プロトコル層との配線契約 (SecurityPipeline)
 */
use std::sync::Arc;

use crate::openid::{AuthorizedSessionStore, ClientRegistry, RoleMapper};
use crate::principal::Principal;

/// Post-logout redirect used when a backend configures no override.
pub const DEFAULT_LOGOUT_SUCCESS_URL: &str = "/";

/// Wiring hooks the external protocol layer exposes to a backend at startup.
///
/// The protocol layer owns the actual redirect/code-exchange/token-refresh
/// cycle and the session lifecycle; a backend only hands it the pieces it
/// needs. The registered `RoleMapper` is invoked by the protocol layer after
/// each successful login to compute the identity's authorities.
pub trait SecurityPipeline {
    /// Require an authenticated identity for every request.
    fn require_authentication(&mut self);

    /// Path of the login page users are sent to when unauthenticated.
    fn set_login_page(&mut self, path: &str);

    /// Enable OAuth2/OIDC login against the given client registrations,
    /// storing completed logins in `sessions` and mapping authorities
    /// through `authorities_mapper`.
    fn enable_oauth2_login(
        &mut self,
        clients: Arc<ClientRegistry>,
        sessions: Arc<AuthorizedSessionStore>,
        authorities_mapper: RoleMapper,
    );
}

/// Capability set every authentication backend variant implements.
///
/// The composition root selects the active variant and wires it into the
/// request pipeline by passing it around; nothing is looked up through
/// ambient context. Trait defaults cover backends without an authorization
/// concept or without tokens to inject.
pub trait AuthenticationBackend: Send + Sync {
    /// Fixed identifier of this backend variant.
    fn name(&self) -> &'static str;

    /// Whether this backend can grant per-user authorities.
    fn has_authorization(&self) -> bool {
        false
    }

    /// Wire this backend into the request-handling pipeline.
    fn configure_security(&self, pipeline: &mut dyn SecurityPipeline);

    /// URI the login page links to in order to start the login handshake.
    fn login_redirect_uri(&self) -> String;

    /// Where to send the user after logout. Never fails.
    fn logout_success_url(&self) -> String {
        DEFAULT_LOGOUT_SUCCESS_URL.to_string()
    }

    /// Hook invoked by the container-launch path right before a container is
    /// spawned for `principal`. Default: inject nothing.
    fn customize_container_env(&self, _principal: Option<&Principal>, _env: &mut Vec<String>) {}
}
