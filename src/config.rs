//! Startup configuration.
//!
//! All credentials and tunables are read once at process start into an
//! explicit [`Config`] that is handed to the collaborators; business logic
//! never reads the environment. A `.env` file is honored in development
//! (loaded by `main` before [`Config::from_env`] runs).

use std::env;
use thiserror::Error;

/// Error raised when required configuration is missing or malformed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },

    #[error("REQUIRE_SIGNATURE is enabled but SHIPPO_WEBHOOK_SECRET is not set")]
    SignatureWithoutSecret,
}

/// Credentials for the file-storage provider's refresh-token flow.
///
/// Grouped because they are only usable together; the folder-creation
/// endpoint fails with a configuration error when the group is absent.
#[derive(Debug, Clone)]
pub struct StorageCredentials {
    pub refresh_token: String,
    pub app_key: String,
    pub app_secret: String,
}

/// Service configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tabular-database API key.
    pub airtable_api_key: String,
    /// Tabular-database base id.
    pub airtable_base_id: String,

    /// Mail API key.
    pub sendgrid_api_key: String,
    /// Verified sender address for all outbound mail.
    pub sendgrid_from_email: String,
    /// Marketing list to enroll prospects in. When unset, enrollment is
    /// skipped with a warning rather than failing.
    pub sendgrid_list_id: Option<String>,
    /// Internal address that receives contact-form notifications.
    pub notification_email: String,

    /// File-storage credentials, when configured.
    pub storage: Option<StorageCredentials>,

    /// Shared secret for tracking-webhook signatures.
    pub shippo_webhook_secret: Option<String>,
    /// Whether tracking webhooks must carry a valid signature.
    ///
    /// Defaults to "secret is configured": an unconfigured dev environment
    /// accepts everything, a configured one verifies. `REQUIRE_SIGNATURE`
    /// can turn verification off despite a secret; turning it on without a
    /// secret fails startup (there is nothing to verify against).
    pub require_signature: bool,

    /// TCP port to listen on.
    pub port: u16,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        let shippo_webhook_secret = optional("SHIPPO_WEBHOOK_SECRET");
        let require_signature = signature_policy(
            shippo_webhook_secret.is_some(),
            optional("REQUIRE_SIGNATURE").as_deref(),
        )?;

        let storage = match (
            optional("DROPBOX_REFRESH_TOKEN"),
            optional("DROPBOX_APP_KEY"),
            optional("DROPBOX_APP_SECRET"),
        ) {
            (Some(refresh_token), Some(app_key), Some(app_secret)) => Some(StorageCredentials {
                refresh_token,
                app_key,
                app_secret,
            }),
            _ => None,
        };

        let port = match optional("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidVar {
                    var: "PORT",
                    value: raw,
                })?,
            None => 3000,
        };

        Ok(Config {
            airtable_api_key: required("AIRTABLE_API_KEY")?,
            airtable_base_id: required("AIRTABLE_BASE_ID")?,
            sendgrid_api_key: required("SENDGRID_API_KEY")?,
            sendgrid_from_email: required("SENDGRID_FROM_EMAIL")?,
            sendgrid_list_id: optional("SENDGRID_LIST_ID"),
            notification_email: optional("NOTIFICATION_EMAIL")
                .unwrap_or_else(|| "info@heritagebox.com".to_string()),
            storage,
            shippo_webhook_secret,
            require_signature,
            port,
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    optional(var).ok_or(ConfigError::MissingVar(var))
}

fn optional(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}

/// Resolves whether tracking webhooks must be verified.
///
/// Without an explicit `REQUIRE_SIGNATURE`, verification follows the
/// secret: configured means verified. An explicit `true` with no secret is
/// a startup error, not a permissive fallback; there is no key to verify
/// against, and silently accepting everything would contradict what the
/// operator asked for.
fn signature_policy(
    secret_present: bool,
    raw_flag: Option<&str>,
) -> Result<bool, ConfigError> {
    match raw_flag {
        Some(raw) => {
            let require = parse_bool("REQUIRE_SIGNATURE", raw)?;
            if require && !secret_present {
                return Err(ConfigError::SignatureWithoutSecret);
            }
            Ok(require)
        }
        None => Ok(secret_present),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            var,
            value: raw.to_string(),
        }),
    }
}
