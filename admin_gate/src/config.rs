//! Central configuration for the admin-gate crate
//!
//! Cookie settings follow the environment-variable-with-default pattern; the
//! TLS policy is parsed eagerly through `GateConfig::from_env` so that a
//! malformed policy aborts startup instead of serving with an ambiguous
//! security posture.

use std::env;
use std::sync::LazyLock;

use url::Url;

use crate::errors::ConfigError;

/// Path prefix of the protected admin area. Everything below it is gated.
pub const ADMIN_PREFIX: &str = "/ghost/";

pub const SIGNIN_PATH: &str = "/ghost/signin/";
pub const SIGNUP_PATH: &str = "/ghost/signup/";
pub const SIGNOUT_PATH: &str = "/ghost/signout/";
pub const FORGOTTEN_PATH: &str = "/ghost/forgotten/";
pub const RESET_PATH: &str = "/ghost/reset/";

/// Sessions live for exactly twelve hours from creation. The cookie
/// `Expires` attribute and the stored expiry both derive from the same
/// creation instant.
pub const SESSION_TTL_HOURS: i64 = 12;
pub const SESSION_COOKIE_MAX_AGE: i64 = SESSION_TTL_HOURS * 3600;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("admin-session".to_string())
});

pub(crate) static GATE_SERVER_SECRET: LazyLock<Vec<u8>> =
    LazyLock::new(|| match env::var("GATE_SERVER_SECRET") {
        Ok(secret) => secret.into_bytes(),
        Err(_) => "default_secret_key_change_in_production"
            .to_string()
            .into_bytes(),
    });

/// TLS enforcement policy for the admin area. Immutable for the process
/// lifetime. The redirect variant carries the canonical secure origin so an
/// unconfigured origin is unrepresentable.
#[derive(Debug, Clone)]
pub enum TlsPolicy {
    Disabled,
    RequireRedirect { secure_origin: Url },
    RequireReject,
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub tls: TlsPolicy,
    /// Honor `X-Forwarded-Proto` only when explicitly configured, so the
    /// header cannot be spoofed when no reverse proxy is in front.
    pub trust_proxy: bool,
}

impl GateConfig {
    /// Read the gate configuration from the environment.
    ///
    /// * `ADMIN_TLS_MODE` - `disabled` (default), `require-redirect` or
    ///   `require-reject`
    /// * `ADMIN_SECURE_ORIGIN` - canonical `https://` origin, required for
    ///   `require-redirect`
    /// * `ADMIN_TRUST_PROXY` - `true` to honor `X-Forwarded-Proto`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = env::var("ADMIN_TLS_MODE").unwrap_or_else(|_| "disabled".to_string());
        let origin = env::var("ADMIN_SECURE_ORIGIN").ok();
        let trust_proxy = env::var("ADMIN_TRUST_PROXY")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let tls = match mode.as_str() {
            "disabled" => TlsPolicy::Disabled,
            "require-reject" => TlsPolicy::RequireReject,
            "require-redirect" => {
                let raw = origin.ok_or_else(|| {
                    ConfigError::MissingSecureOrigin(
                        "ADMIN_SECURE_ORIGIN is required for require-redirect".to_string(),
                    )
                })?;
                TlsPolicy::RequireRedirect {
                    secure_origin: parse_secure_origin(&raw)?,
                }
            }
            other => return Err(ConfigError::InvalidTlsMode(other.to_string())),
        };

        Ok(Self { tls, trust_proxy })
    }
}

/// Parse and validate a canonical secure origin. The scheme must be https.
pub fn parse_secure_origin(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidSecureOrigin(e.to_string()))?;
    if url.scheme() != "https" {
        return Err(ConfigError::InvalidSecureOrigin(format!(
            "secure origin must use https, got {}",
            url.scheme()
        )));
    }
    Ok(url)
}
