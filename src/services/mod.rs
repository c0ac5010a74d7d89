pub mod account_service;
pub mod context;
pub mod maintenance;
pub mod notifier;
pub mod session_service;
