pub mod account;
pub mod auth;
pub mod oauth;
mod router;

pub use router::router;
