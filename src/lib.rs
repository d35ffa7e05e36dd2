/*
 * Responsibility
 * - podproxy の OpenID Connect 認証バックエンド (crate root)
 * - モジュール宣言と公開 API の re-export のみ (ロジックは置かない)
 */
pub mod backend;
pub mod config;
pub mod error;
pub mod openid;
pub mod principal;

pub use backend::{AuthenticationBackend, SecurityPipeline, DEFAULT_LOGOUT_SUCCESS_URL};
pub use config::Settings;
pub use error::ConfigError;
pub use openid::OpenIdAuthenticationBackend;
pub use principal::{GrantedAuthority, Principal};
