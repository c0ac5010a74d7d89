pub mod api;
mod entry;
pub mod payloads;

pub use entry::{AUTH_PREFIX, router};
