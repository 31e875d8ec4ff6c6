//! Application configuration for notion-sync.
//!
//! User config lives at `~/.notionsync/notionsync.toml`.
//! CLI flags override config file values, which override defaults.
//! Credentials never live in the file: it only names the env vars holding them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{NotionSyncError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "notionsync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".notionsync";

/// Largest page size the Notion API accepts.
const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Config structs (matching notionsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notion API settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Local output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[notion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Base URL of the Notion REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Value sent in the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// Name of the env var holding the integration token (never store the token itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Name of the env var holding the database ID.
    #[serde(default = "default_database_id_env")]
    pub database_id_env: String,

    /// Select property used to filter pages.
    #[serde(default = "default_status_property")]
    pub status_property: String,

    /// Value the status property must equal for a page to be synced.
    #[serde(default = "default_status_value")]
    pub status_value: String,

    /// Page size for block-children listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP request timeout in seconds. Unset means the transport default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            notion_version: default_notion_version(),
            api_key_env: default_api_key_env(),
            database_id_env: default_database_id_env(),
            status_property: default_status_property(),
            status_value: default_status_value(),
            page_size: default_page_size(),
            timeout_secs: None,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.notion.com/v1".into()
}
fn default_notion_version() -> String {
    "2022-06-28".into()
}
fn default_api_key_env() -> String {
    "NOTION_API_KEY".into()
}
fn default_database_id_env() -> String {
    "NOTION_DATABASE_ID".into()
}
fn default_status_property() -> String {
    "Status".into()
}
fn default_status_value() -> String {
    "Completed".into()
}
fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory the markdown files are written under.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl OutputConfig {
    /// Create the output root if it does not exist yet and return it.
    pub fn ensure_dir(&self) -> Result<PathBuf> {
        let dir = PathBuf::from(&self.dir);
        std::fs::create_dir_all(&dir).map_err(|e| NotionSyncError::io(&dir, e))?;
        Ok(dir)
    }
}

fn default_output_dir() -> String {
    "notes".into()
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The two externally supplied secrets every sync needs.
#[derive(Clone)]
pub struct Credentials {
    /// Notion integration token, sent as a bearer credential.
    pub api_key: String,
    /// ID of the database to query.
    pub database_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("database_id", &self.database_id)
            .finish()
    }
}

/// Resolve credentials from explicit overrides, falling back to env lookups.
///
/// `lookup` maps an env var name to its value (usually `std::env::var(..).ok()`).
/// Empty values count as missing. When anything is missing the error lists
/// exactly the env var names that were not satisfied.
pub fn resolve_credentials(
    config: &NotionConfig,
    api_key: Option<String>,
    database_id: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let api_key = non_empty(api_key).or_else(|| non_empty(lookup(&config.api_key_env)));
    let database_id =
        non_empty(database_id).or_else(|| non_empty(lookup(&config.database_id_env)));

    match (api_key, database_id) {
        (Some(api_key), Some(database_id)) => Ok(Credentials {
            api_key,
            database_id,
        }),
        (api_key, database_id) => {
            let mut names = Vec::new();
            if api_key.is_none() {
                names.push(config.api_key_env.clone());
            }
            if database_id.is_none() {
                names.push(config.database_id_env.clone());
            }
            Err(NotionSyncError::MissingEnv { names })
        }
    }
}

// ---------------------------------------------------------------------------
// Sync config (runtime, merged from config + CLI flags + env)
// ---------------------------------------------------------------------------

/// Runtime sync configuration, constructed once at process entry.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Token and database ID.
    pub credentials: Credentials,
    /// Base URL of the Notion REST API.
    pub api_base_url: Url,
    /// Value sent in the `Notion-Version` header.
    pub notion_version: String,
    /// Select property used to filter pages.
    pub status_property: String,
    /// Value the status property must equal.
    pub status_value: String,
    /// Page size for block-children listing.
    pub page_size: u32,
    /// HTTP request timeout in seconds, if any.
    pub timeout_secs: Option<u64>,
    /// Root directory for written markdown files.
    pub output_dir: PathBuf,
}

impl SyncConfig {
    /// Merge the file config with resolved credentials, validating values.
    pub fn new(config: &AppConfig, credentials: Credentials) -> Result<Self> {
        let notion = &config.notion;

        let api_base_url = Url::parse(&notion.api_base_url).map_err(|e| {
            NotionSyncError::config(format!(
                "invalid api_base_url '{}': {e}",
                notion.api_base_url
            ))
        })?;

        if notion.page_size == 0 || notion.page_size > MAX_PAGE_SIZE {
            return Err(NotionSyncError::config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                notion.page_size
            )));
        }

        Ok(Self {
            credentials,
            api_base_url,
            notion_version: notion.notion_version.clone(),
            status_property: notion.status_property.clone(),
            status_value: notion.status_value.clone(),
            page_size: notion.page_size,
            timeout_secs: notion.timeout_secs,
            output_dir: PathBuf::from(&config.output.dir),
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.notionsync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| NotionSyncError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.notionsync/notionsync.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NotionSyncError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        NotionSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NotionSyncError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| NotionSyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NotionSyncError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
