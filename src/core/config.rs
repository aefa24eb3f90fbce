use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
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

/// Admin bearer-token validation settings
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub jwt_leeway: Duration,
}

/// Which cache store backs the read-through cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis { url: String },
}

impl CacheBackend {
    pub fn name(&self) -> &'static str {
        match self {
            CacheBackend::Memory => "memory",
            CacheBackend::Redis { .. } => "redis",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Prepended to every cache key so several deployments can share one store
    pub key_prefix: String,
    /// TTL applied to every cached view
    pub ttl: Duration,
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
            auth: AuthConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Catalogs are small; a handful of connections is plenty
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

impl AuthConfig {
    const DEFAULT_ISSUER: &'static str = "webdir";
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("ADMIN_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "ADMIN_JWT_SECRET environment variable is required".to_string())?;

        let issuer =
            env::var("ADMIN_JWT_ISSUER").unwrap_or_else(|_| Self::DEFAULT_ISSUER.to_string());

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            issuer,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl CacheConfig {
    const DEFAULT_KEY_PREFIX: &'static str = "webdir:";
    const DEFAULT_TTL_SECS: u64 = 3600; // 1 hour
    const MAX_TTL_SECS: u64 = 30 * 24 * 3600;

    pub fn from_env() -> Result<Self, String> {
        let backend = Self::parse_backend(
            &env::var("CACHE_BACKEND").unwrap_or_else(|_| "memory".to_string()),
            env::var("CACHE_REDIS_URL").ok().filter(|s| !s.is_empty()),
        )?;

        let key_prefix =
            env::var("CACHE_KEY_PREFIX").unwrap_or_else(|_| Self::DEFAULT_KEY_PREFIX.to_string());

        let ttl = Self::parse_ttl(
            &env::var("CACHE_TTL_SECS").unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string()),
        )?;

        Ok(Self {
            backend,
            key_prefix,
            ttl,
        })
    }

    fn parse_ttl(raw: &str) -> Result<Duration, String> {
        let ttl_secs = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| "CACHE_TTL_SECS must be a valid number".to_string())?;

        if ttl_secs == 0 {
            return Err("CACHE_TTL_SECS must be greater than zero".to_string());
        }
        if ttl_secs > Self::MAX_TTL_SECS {
            return Err(format!(
                "CACHE_TTL_SECS must be at most {} (30 days)",
                Self::MAX_TTL_SECS
            ));
        }

        Ok(Duration::from_secs(ttl_secs))
    }

    fn parse_backend(name: &str, redis_url: Option<String>) -> Result<CacheBackend, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "redis" => redis_url
                .map(|url| CacheBackend::Redis { url })
                .ok_or_else(|| "CACHE_REDIS_URL is required when CACHE_BACKEND=redis".to_string()),
            other => Err(format!(
                "Invalid CACHE_BACKEND '{}': expected 'memory' or 'redis'",
                other
            )),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Website Directory API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the website directory".to_string());

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_memory() {
        assert_eq!(
            CacheConfig::parse_backend("memory", None),
            Ok(CacheBackend::Memory)
        );
        assert_eq!(
            CacheConfig::parse_backend(" Memory ", Some("redis://x".to_string())),
            Ok(CacheBackend::Memory)
        );
    }

    #[test]
    fn test_parse_backend_redis_requires_url() {
        assert!(CacheConfig::parse_backend("redis", None).is_err());
        assert_eq!(
            CacheConfig::parse_backend("redis", Some("redis://localhost:6379".to_string())),
            Ok(CacheBackend::Redis {
                url: "redis://localhost:6379".to_string()
            })
        );
    }

    #[test]
    fn test_parse_backend_unknown() {
        assert!(CacheConfig::parse_backend("memcached", None).is_err());
    }

    #[test]
    fn test_parse_ttl_bounds() {
        assert_eq!(CacheConfig::parse_ttl("3600"), Ok(Duration::from_secs(3600)));
        assert!(CacheConfig::parse_ttl("0").is_err());
        assert!(CacheConfig::parse_ttl("abc").is_err());
        assert!(CacheConfig::parse_ttl("18446744073709551615").is_err());
        assert_eq!(
            CacheConfig::parse_ttl("2592000"),
            Ok(Duration::from_secs(2_592_000))
        );
        assert!(CacheConfig::parse_ttl("2592001").is_err());
    }

    #[test]
    fn test_swagger_credentials() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("admin:secret".to_string()));
    }
}
