use crate::openid::session::AuthorizedSessionStore;
use crate::principal::Principal;

/// Environment variable handed to spawned containers. The name is part of the
/// contract with the container runtime.
pub const ENV_TOKEN_NAME: &str = "PODPROXY_OIDC_ACCESS_TOKEN";

/// Appends `PODPROXY_OIDC_ACCESS_TOKEN=<token>` for the authenticated
/// principal's session, or leaves `env` untouched when there is no principal,
/// no session, or no token. Existing entries are never altered.
///
/// This is the one point where a bearer token crosses into a user-controlled
/// process's environment; the token value must not be logged here.
pub fn append_access_token(
    store: &AuthorizedSessionStore,
    registration_id: &str,
    principal: Option<&Principal>,
    env: &mut Vec<String>,
) {
    let Some(principal) = principal else {
        return;
    };

    let Some(session) = store.get(registration_id, &principal.name) else {
        return;
    };

    if session.access_token.is_empty() {
        return;
    }

    env.push(format!("{ENV_TOKEN_NAME}={}", session.access_token));
}
