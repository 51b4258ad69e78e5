use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://www.wikidata.org/w/api.php";
const DEFAULT_SPARQL_URL: &str = "https://query.wikidata.org/sparql";
const DEFAULT_PAGE_PREFIX: &str = "Pasleim/Items_for_deletion/Page_deleted";
const DEFAULT_PAGE_NAMESPACE: u64 = 2;
const DEFAULT_REPORT_PAGE: &str = "User:MisterSynergy/sysop/pagedeleted stats";
const DEFAULT_EDIT_SUMMARY: &str = "update statistics (weekly job via Toolforge)";
const DEFAULT_QUERY_DELAY_SECONDS: u64 = 5;
const DEFAULT_QUERY_TIMEOUT_SECONDS: u64 = 120;
const DEFAULT_FAILURE_LOG: &str = "pagedeleted_templog.txt";

// ---------------------------------------------------------------------------
// BotConfig – the JSON config file plus typed accessors with defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct BotConfig {
    config: Value,
}

impl BotConfig {
    pub fn new_from_config(config: &Value) -> Self {
        Self {
            config: config.to_owned(),
        }
    }

    /// Reads and parses the JSON config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Can not open config file at {}", path.display()))?;
        let config: Value = serde_json::from_reader(file)
            .with_context(|| format!("Can not parse JSON from config file {}", path.display()))?;
        if !config.is_object() {
            return Err(anyhow!(
                "Config file {} does not contain a JSON object",
                path.display()
            ));
        }
        Ok(Self::new_from_config(&config))
    }

    /// `config.json` in the current working directory.
    pub fn default_path() -> Result<PathBuf> {
        let basedir = std::env::current_dir().context("Can't get CWD")?;
        Ok(basedir.join("config.json"))
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.config[key].as_str().unwrap_or(default).to_string()
    }

    fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.config[key].as_u64().unwrap_or(default)
    }

    // ------------------------------------------------------------------
    // Endpoints
    // ------------------------------------------------------------------

    pub fn api_url(&self) -> String {
        self.string_or("api_url", DEFAULT_API_URL)
    }

    pub fn sparql_url(&self) -> String {
        self.string_or("sparql_url", DEFAULT_SPARQL_URL)
    }

    pub fn user_agent(&self) -> String {
        let default = format!(
            "pagedeleted_stats/{} (Wikidata bot)",
            env!("CARGO_PKG_VERSION")
        );
        self.string_or("user_agent", &default)
    }

    // ------------------------------------------------------------------
    // Page discovery and report target
    // ------------------------------------------------------------------

    pub fn page_prefix(&self) -> String {
        self.string_or("page_prefix", DEFAULT_PAGE_PREFIX)
    }

    pub fn page_namespace(&self) -> u64 {
        self.u64_or("page_namespace", DEFAULT_PAGE_NAMESPACE)
    }

    pub fn report_page(&self) -> String {
        self.string_or("report_page", DEFAULT_REPORT_PAGE)
    }

    pub fn edit_summary(&self) -> String {
        self.string_or("edit_summary", DEFAULT_EDIT_SUMMARY)
    }

    // ------------------------------------------------------------------
    // Query behaviour
    // ------------------------------------------------------------------

    pub fn query_delay(&self) -> Duration {
        Duration::from_secs(self.u64_or("query_delay_seconds", DEFAULT_QUERY_DELAY_SECONDS))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.u64_or("query_timeout_seconds", DEFAULT_QUERY_TIMEOUT_SECONDS))
    }

    // ------------------------------------------------------------------
    // Local files
    // ------------------------------------------------------------------

    pub fn template_dir(&self) -> PathBuf {
        PathBuf::from(self.string_or("template_dir", "."))
    }

    pub fn failure_log_path(&self) -> PathBuf {
        PathBuf::from(self.string_or("failure_log", DEFAULT_FAILURE_LOG))
    }

    // ------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------

    /// Bot-password credentials. Only required when actually publishing.
    pub fn credentials(&self) -> Result<(String, String)> {
        let user = self.config["user"]
            .as_str()
            .ok_or_else(|| anyhow!("No 'user' in config file"))?;
        let password = self.config["password"]
            .as_str()
            .ok_or_else(|| anyhow!("No 'password' in config file"))?;
        Ok((user.to_string(), password.to_string()))
    }
}
