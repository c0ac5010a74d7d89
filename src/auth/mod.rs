pub mod bootstrap;
pub mod cookies;
pub mod jwt;
pub mod oauth;
pub mod origin;
pub mod password;
mod types;

pub use types::{AuthProviderKind, Claims, Role, TokenKind, TokenPair, TokenSubject};
