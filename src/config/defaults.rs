pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
pub const DEFAULT_RESET_TTL_MINS: i64 = 15;
pub const DEFAULT_SECURE_COOKIES: bool = false;
pub const DEFAULT_PURGE_INTERVAL_SECS: i64 = 60 * 60;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const APPLE_TOKEN_URL: &str = "https://appleid.apple.com/auth/token";
