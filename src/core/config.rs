use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Session cookie signing and lifetime
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl: Duration,
    /// Whether the session cookie is marked `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

// Keep the signing secret out of startup logs
impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Local upload directory configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
}

/// OpenAI-compatible chat completion provider (Groq by default)
#[derive(Clone)]
pub struct LlmConfig {
    /// Optional: requests fail with an external service error when unset
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            session: SessionConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            llm: LlmConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 16 * 1024 * 1024; // 16MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Comma-separated; "*" allows any origin but disables credentialed requests
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SessionConfig {
    const DEFAULT_TTL_SECS: u64 = 7 * 24 * 3600; // 7 days

    pub fn from_env() -> Result<Self, String> {
        let secret = env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SECRET_KEY environment variable is required".to_string())?;

        let ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid number".to_string())?;

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|_| "SESSION_COOKIE_SECURE must be true or false".to_string())?;

        Ok(Self {
            secret,
            ttl: Duration::from_secs(ttl_secs),
            cookie_secure,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let upload_dir = env::var("UPLOAD_FOLDER")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "static/uploads".to_string());

        Ok(Self {
            upload_dir: PathBuf::from(upload_dir),
        })
    }
}

impl LlmConfig {
    const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";
    const DEFAULT_MODEL: &'static str = "llama3-8b-8192";
    const DEFAULT_TIMEOUT_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("GROQ_API_KEY").ok().filter(|s| !s.is_empty());

        let base_url = env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = env::var("LLM_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        let timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "LLM_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            api_key,
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Ailytix API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Upload tabular data, explore charts and ask questions".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
