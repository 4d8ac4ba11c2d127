// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "affinity.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Retention ---
pub const DEFAULT_RETENTION_CAPACITY: usize = 60;
pub const DEFAULT_CYCLE_LENGTH: usize = 6;

// --- Decay ---
pub const DEFAULT_SCALE_FACTOR: f64 = 0.05;
pub const DEFAULT_SCALE_EXPONENT: f64 = 3.3;
pub const DEFAULT_RECENCY_RATE: f64 = 0.2;
pub const DEFAULT_MAX_TRANSACTION_RETRIES: u32 = 5;

// --- Analysis ---
pub const DEFAULT_ANALYSIS_PROVIDER: &str = "api";
pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;
pub const DEFAULT_ANALYSIS_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_ANALYSIS_MAX_TOKENS: u32 = 200;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;

// --- Ranking ---
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_SIMILARITY_MIDPOINT: f64 = 0.5;
pub const DEFAULT_AMPLIFICATION_STEEPNESS: f64 = 10.0;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
