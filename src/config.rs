//! Configuration types.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::error::ConfigError;

/// Default picker page opened from the reservation buttons template.
pub const DEFAULT_RESERVATION_PICKER_URL: &str = "https://liff.line.me/estate-reservation";

/// Bot configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Channel access token for the Messaging API.
    pub channel_access_token: SecretString,
    /// Channel secret used to verify `x-line-signature`.
    pub channel_secret: SecretString,
    /// HTTP listen port.
    pub port: u16,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// JSON file mapping rich menu names to platform ids.
    pub rich_menu_ids_path: PathBuf,
    /// Page that lets the user pick a viewing date and time.
    pub reservation_picker_url: String,
    /// User or group id that receives confirmed reservations, if any.
    pub admin_notify_target: Option<String>,
    /// Timeout applied by the HTTP client to every platform call.
    pub api_timeout: Duration,
}

impl BotConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let channel_access_token = std::env::var("LINE_CHANNEL_ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("LINE_CHANNEL_ACCESS_TOKEN".into()))?;
        let channel_secret = std::env::var("LINE_CHANNEL_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("LINE_CHANNEL_SECRET".into()))?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".into(),
                message: format!("{e}"),
            })?,
            Err(_) => 3000,
        };

        let db_path = std::env::var("ESTATE_BOT_DB_PATH")
            .unwrap_or_else(|_| "./data/estate-bot.db".to_string())
            .into();

        let rich_menu_ids_path = std::env::var("RICH_MENU_IDS_PATH")
            .unwrap_or_else(|_| "./richmenu-ids.json".to_string())
            .into();

        let reservation_picker_url = std::env::var("RESERVATION_PICKER_URL")
            .unwrap_or_else(|_| DEFAULT_RESERVATION_PICKER_URL.to_string());

        let admin_notify_target = std::env::var("ADMIN_NOTIFY_TARGET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let api_timeout_secs: u64 = std::env::var("LINE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            channel_access_token: SecretString::from(channel_access_token),
            channel_secret: SecretString::from(channel_secret),
            port,
            db_path,
            rich_menu_ids_path,
            reservation_picker_url,
            admin_notify_target,
            api_timeout: Duration::from_secs(api_timeout_secs),
        })
    }
}

/// Static map from rich menu name (e.g. `"main"`) to platform menu id.
///
/// Produced once by the provisioning step and only read here.
#[derive(Debug, Clone, Default)]
pub struct RichMenuMap {
    ids: HashMap<String, String>,
}

impl RichMenuMap {
    pub fn new(ids: HashMap<String, String>) -> Self {
        Self { ids }
    }

    /// Load the map from a JSON object file.
    ///
    /// A missing file yields an empty map so the bot can run before menus are
    /// provisioned; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Rich menu id file not found, switch_tab disabled");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        let ids: HashMap<String, String> = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), menus = ids.len(), "Rich menu ids loaded");
        Ok(Self { ids })
    }

    /// Resolve a menu name to its platform id.
    pub fn get(&self, menu: &str) -> Option<&str> {
        self.ids.get(menu).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
