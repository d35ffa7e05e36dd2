use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::config::{Settings, keys};
use crate::principal::GrantedAuthority;

const ROLE_PREFIX: &str = "ROLE_";

/// Maps identity-token claims to normalized `ROLE_*` authorities.
///
/// Pure: no I/O, no mutation of inputs. The protocol layer invokes `map`
/// once per completed login.
#[derive(Clone, Debug, Default)]
pub struct RoleMapper {
    roles_claim: Option<String>,
}

impl RoleMapper {
    /// An empty claim name means no custom mapping is configured.
    pub fn new(roles_claim: Option<String>) -> Self {
        Self {
            roles_claim: roles_claim.filter(|claim| !claim.is_empty()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.get(keys::ROLES_CLAIM).map(str::to_string))
    }

    /// With no roles claim configured this is the identity mapping: the input
    /// comes back unchanged. Otherwise each OIDC authority contributes the
    /// roles listed in its claim, normalized and deduplicated; authorities
    /// without id-token claims are dropped.
    pub fn map(&self, authorities: Vec<GrantedAuthority>) -> Vec<GrantedAuthority> {
        let Some(claim_name) = &self.roles_claim else {
            return authorities;
        };

        let mut mapped = HashSet::new();
        for authority in &authorities {
            let GrantedAuthority::Oidc { claims, .. } = authority else {
                continue;
            };

            debug!(
                claim = %claim_name,
                available = ?claims.keys().collect::<Vec<_>>(),
                "checking id token for roles claim"
            );

            // Absent claim, or a claim that is not a list: nothing to grant.
            let Some(roles) = claims.get(claim_name).and_then(Value::as_array) else {
                continue;
            };

            for role in roles.iter().filter_map(Value::as_str) {
                mapped.insert(normalize_role(role));
            }
        }

        mapped.into_iter().map(GrantedAuthority::Simple).collect()
    }
}

fn normalize_role(role: &str) -> String {
    if role.to_uppercase().starts_with(ROLE_PREFIX) {
        role.to_uppercase()
    } else {
        format!("{ROLE_PREFIX}{role}").to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::principal::Claims;

    fn claims_with_roles(roles: &[&str]) -> Claims {
        let mut claims = Claims::new();
        claims.insert("email".into(), json!("user@example.com"));
        claims.insert("roles".into(), json!(roles));
        claims
    }

    fn names(authorities: &[GrantedAuthority]) -> HashSet<&str> {
        authorities.iter().map(GrantedAuthority::name).collect()
    }

    #[test]
    fn no_claim_configured_is_identity_mapping() {
        let mapper = RoleMapper::new(None);
        let input = vec![
            GrantedAuthority::simple("OAUTH2_USER"),
            GrantedAuthority::oidc("OIDC_USER", claims_with_roles(&["admin"])),
        ];

        assert_eq!(mapper.map(input.clone()), input);

        // Empty string behaves the same as unset.
        let mapper = RoleMapper::new(Some(String::new()));
        assert_eq!(mapper.map(input.clone()), input);
    }

    #[test]
    fn roles_are_prefixed_uppercased_and_deduplicated() {
        let mapper = RoleMapper::new(Some("roles".into()));
        let input = vec![GrantedAuthority::oidc(
            "OIDC_USER",
            claims_with_roles(&["admin", "ROLE_user", "Viewer", "role_admin"]),
        )];

        let mapped = mapper.map(input);

        assert_eq!(
            names(&mapped),
            HashSet::from(["ROLE_ADMIN", "ROLE_USER", "ROLE_VIEWER"])
        );
        assert_eq!(mapped.len(), 3);
    }

    #[test]
    fn prefix_detection_is_case_insensitive() {
        let mapper = RoleMapper::new(Some("roles".into()));
        let input = vec![GrantedAuthority::oidc(
            "OIDC_USER",
            claims_with_roles(&["rOlE_ops"]),
        )];

        assert_eq!(names(&mapper.map(input)), HashSet::from(["ROLE_OPS"]));
    }

    #[test]
    fn absent_claim_contributes_nothing() {
        let mapper = RoleMapper::new(Some("roles".into()));
        let mut claims = Claims::new();
        claims.insert("email".into(), json!("user@example.com"));

        let mapped = mapper.map(vec![GrantedAuthority::oidc("OIDC_USER", claims)]);

        assert!(mapped.is_empty());
    }

    #[test]
    fn non_list_claim_contributes_nothing() {
        let mapper = RoleMapper::new(Some("roles".into()));
        let mut claims = Claims::new();
        claims.insert("roles".into(), json!("admin"));

        let mapped = mapper.map(vec![GrantedAuthority::oidc("OIDC_USER", claims)]);

        assert!(mapped.is_empty());
    }

    #[test]
    fn non_string_list_entries_are_ignored() {
        let mapper = RoleMapper::new(Some("roles".into()));
        let mut claims = Claims::new();
        claims.insert("roles".into(), json!(["admin", 42, null]));

        let mapped = mapper.map(vec![GrantedAuthority::oidc("OIDC_USER", claims)]);

        assert_eq!(names(&mapped), HashSet::from(["ROLE_ADMIN"]));
    }

    // Pins the observed behavior: plain authorities vanish once custom claim
    // mapping is active. Any future change to merge them must update this
    // test deliberately.
    #[test]
    fn plain_authorities_are_dropped_when_mapping_is_active() {
        let mapper = RoleMapper::new(Some("roles".into()));

        let mapped = mapper.map(vec![GrantedAuthority::simple("OAUTH2_USER")]);

        assert!(mapped.is_empty());
    }

    #[test]
    fn roles_from_multiple_authorities_union() {
        let mapper = RoleMapper::new(Some("roles".into()));
        let input = vec![
            GrantedAuthority::oidc("A", claims_with_roles(&["admin"])),
            GrantedAuthority::oidc("B", claims_with_roles(&["viewer", "ADMIN"])),
            GrantedAuthority::simple("OAUTH2_USER"),
        ];

        assert_eq!(
            names(&mapper.map(input)),
            HashSet::from(["ROLE_ADMIN", "ROLE_VIEWER"])
        );
    }
}
