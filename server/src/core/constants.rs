// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "LearnLoop";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "LEARNLOOP_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "LEARNLOOP_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "LEARNLOOP_LOG";

/// Environment variable for the SQLite database path
pub const ENV_DATABASE_PATH: &str = "LEARNLOOP_DATABASE_PATH";

/// Environment variable for the JWT signing secret
pub const ENV_JWT_SECRET: &str = "LEARNLOOP_JWT_SECRET";

/// Environment variable for access-token TTL in minutes
pub const ENV_JWT_EXPIRE_MIN: &str = "LEARNLOOP_JWT_EXPIRE_MIN";

/// Environment variable for allowed CORS origins (comma-separated)
pub const ENV_CORS_ORIGINS: &str = "LEARNLOOP_CORS_ORIGINS";

/// Environment variable for the upload storage root
pub const ENV_UPLOAD_DIR: &str = "LEARNLOOP_UPLOAD_DIR";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Default SQLite database path
pub const DEFAULT_DATABASE_PATH: &str = "learnloop.db";

/// Default upload storage root
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default CORS origins (local dev frontends)
pub const DEFAULT_CORS_ORIGINS: &[&str] =
    &["http://localhost:5173", "http://127.0.0.1:5173"];

// =============================================================================
// Authentication
// =============================================================================

/// Default access-token TTL in minutes
pub const DEFAULT_JWT_EXPIRE_MIN: u64 = 120;

/// Length of a generated JWT signing key in bytes
pub const JWT_SIGNING_KEY_LEN: usize = 32;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Request Limits
// =============================================================================

/// Body limit for JSON API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for material uploads (25 MB)
pub const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Default page size for list endpoints
pub const DEFAULT_LIST_LIMIT: u32 = 200;

/// Maximum page size for list endpoints
pub const MAX_LIST_LIMIT: u32 = 500;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
