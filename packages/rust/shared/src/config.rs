//! Application configuration for SkillPress.
//!
//! User config lives at `~/.skillpress/skillpress.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillPressError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "skillpress.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".skillpress";

// ---------------------------------------------------------------------------
// Config structs (matching skillpress.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Documentation fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Skill bundling settings.
    #[serde(default)]
    pub bundle: BundleConfig,
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL of the documentation site.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sitemap URL listing all article pages.
    #[serde(default = "default_sitemap_url")]
    pub sitemap_url: String,

    /// Directory for raw HTML cache files.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Directory for converted markdown output.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Download attempts per URL before recording a failure.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sitemap_url: default_sitemap_url(),
            cache_dir: default_cache_dir(),
            output_dir: default_output_dir(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://learn.internetcomputer.org".into()
}
fn default_sitemap_url() -> String {
    "https://learn.internetcomputer.org/hc/sitemap.xml".into()
}
fn default_cache_dir() -> String {
    ".cache/html".into()
}
fn default_output_dir() -> String {
    "learn-md".into()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_retries() -> u32 {
    3
}

/// `[bundle]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Directory containing one subdirectory per skill.
    #[serde(default = "default_skills_dir")]
    pub skills_dir: String,

    /// Directory for built single-file distributions.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    /// Repository URL embedded in generated file headers.
    #[serde(default = "default_repo_url")]
    pub repo_url: String,

    /// File order within a skill (SKILL.md is always first, then these).
    #[serde(default = "default_file_order")]
    pub file_order: Vec<String>,

    /// Lowercase prefixes that mark a heading as a code comment, not a
    /// real section heading, when building tables of contents.
    #[serde(default = "default_heading_denylist")]
    pub heading_denylist: Vec<String>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            skills_dir: default_skills_dir(),
            dist_dir: default_dist_dir(),
            repo_url: default_repo_url(),
            file_order: default_file_order(),
            heading_denylist: default_heading_denylist(),
        }
    }
}

fn default_skills_dir() -> String {
    "skills".into()
}
fn default_dist_dir() -> String {
    "dist".into()
}
fn default_repo_url() -> String {
    "https://github.com/skillpress/skills".into()
}
fn default_file_order() -> Vec<String> {
    ["patterns.md", "style.md", "testing.md", "advanced.md"]
        .map(String::from)
        .to_vec()
}
fn default_heading_denylist() -> Vec<String> {
    [
        "install", "initialize", "init ", "add ", "run ", "update", "create", "set ", "get ",
        "check", "download", "configure", "enable", "import", "export", "copy", "move", "delete",
        "remove", "watch", "verbose", "ensure", "deploy", "take ", "list ", "restore", "follow",
        "on ", "step ", "local", "build", "start", "stop", "restart", "#", "//", "/*", "make ",
        "then ", "first ", "next ", "now ", "if ",
    ]
    .map(String::from)
    .to_vec()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.skillpress/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SkillPressError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.skillpress/skillpress.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| SkillPressError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SkillPressError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SkillPressError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SkillPressError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SkillPressError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
