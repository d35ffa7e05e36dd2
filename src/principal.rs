/*
 * Responsibility
 * - 認証済み主体 (Principal) と権限 (GrantedAuthority) の型
 * - 検証済み id token の claims はプロトコル層が materialize して渡す
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims carried by a validated OIDC id token.
pub type Claims = Map<String, Value>;

/// An authority granted to an authenticated identity.
///
/// `Oidc` authorities are derived from an OIDC login and carry the id token's
/// claims; `Simple` authorities are bare permission tokens with no claims
/// attached (plain OAuth2 logins, role-mapping output).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GrantedAuthority {
    Oidc { name: String, claims: Claims },
    Simple(String),
}

impl GrantedAuthority {
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple(name.into())
    }

    pub fn oidc(name: impl Into<String>, claims: Claims) -> Self {
        Self::Oidc {
            name: name.into(),
            claims,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Oidc { name, .. } => name,
            Self::Simple(name) => name,
        }
    }
}

/// The currently authenticated identity, threaded explicitly through the
/// container-launch path instead of living in ambient context.
///
/// `name` is the value of the configured username attribute (default the
/// `email` claim).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
    pub authorities: Vec<GrantedAuthority>,
}

impl Principal {
    pub fn new(name: impl Into<String>, authorities: Vec<GrantedAuthority>) -> Self {
        Self {
            name: name.into(),
            authorities,
        }
    }
}
