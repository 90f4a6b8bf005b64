/// Extensions accepted by the upload endpoint (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

/// Rows of the table embedded into AI prompts
pub const PREVIEW_ROWS: usize = 10;

/// Doughnut suggestions keep this many groups
pub const DOUGHNUT_TOP_GROUPS: usize = 10;

/// Radar suggestions are only emitted for this many numeric columns (inclusive)
pub const RADAR_MIN_COLUMNS: usize = 3;
pub const RADAR_MAX_COLUMNS: usize = 6;

// =============================================================================
// CHAT COMPLETION DEFAULTS
// =============================================================================

pub const LLM_TEMPERATURE: f32 = 0.7;

/// Token budget for the dataset summary
pub const SUMMARY_MAX_TOKENS: u32 = 250;

/// Token budget for a chat reply
pub const CHAT_MAX_TOKENS: u32 = 1024;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "session";
