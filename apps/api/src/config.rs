use anyhow::{bail, Context, Result};

/// Sessions live between one hour and one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub password_pepper: String,
    pub port: u16,
    pub rust_log: String,
    pub db_max_connections: u32,
    pub session_ttl_hours: i64,
    pub seed_sample_data: bool,
    pub admin_bootstrap: Option<AdminBootstrap>,
    pub cors_allowed_origin: Option<String>,
}

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let admin_bootstrap = match (optional_env("ADMIN_EMAIL"), optional_env("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (None, None) => None,
            _ => bail!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            password_pepper: require_env("PASSWORD_PEPPER")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            session_ttl_hours: parse_session_ttl(
                &std::env::var("SESSION_TTL_HOURS").unwrap_or_else(|_| "168".to_string()),
            )?,
            seed_sample_data: parse_bool(
                "SEED_SAMPLE_DATA",
                optional_env("SEED_SAMPLE_DATA").as_deref(),
            )?,
            admin_bootstrap,
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_session_ttl(raw: &str) -> Result<i64> {
    let hours = raw
        .trim()
        .parse::<i64>()
        .context("SESSION_TTL_HOURS must be an integer")?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        bail!("SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}, got {hours}");
    }
    Ok(hours)
}

/// Unset means `false`.
fn parse_bool(key: &str, raw: Option<&str>) -> Result<bool> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => bail!("{key} must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_defaults_to_false() {
        assert!(!parse_bool("SEED_SAMPLE_DATA", None).unwrap());
    }

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("X", Some("TRUE")).unwrap());
        assert!(parse_bool("X", Some(" yes ")).unwrap());
        assert!(!parse_bool("X", Some("off")).unwrap());
    }

    #[test]
    fn test_session_ttl_accepts_range_bounds() {
        assert_eq!(parse_session_ttl("168").unwrap(), 168);
        assert_eq!(parse_session_ttl(" 1 ").unwrap(), 1);
        assert_eq!(parse_session_ttl("8760").unwrap(), MAX_SESSION_TTL_HOURS);
    }

    #[test]
    fn test_session_ttl_rejects_out_of_range() {
        for raw in ["0", "-5", "8761", "9000000000000"] {
            let err = parse_session_ttl(raw).unwrap_err();
            assert!(err.to_string().contains("between 1 and"), "{raw}: {err}");
        }
        assert!(parse_session_ttl("a week").is_err());
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("SEED_SAMPLE_DATA", Some("maybe")).unwrap_err();
        assert!(err.to_string().contains("SEED_SAMPLE_DATA"));
    }
}
