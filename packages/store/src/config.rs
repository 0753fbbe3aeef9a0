//! # Site configuration (`billwise.toml`)
//!
//! Everything the auth layer needs to know about its deployment, loaded once at
//! start-up (filename: [`BillwiseConfig::filename`] = `"billwise.toml"`).
//!
//! ## Structure
//!
//! ```toml
//! [site]
//! production_host = "bonellieric98-sys.github.io"
//! production_base_path = "/invoicing-project"
//! development_hosts = ["localhost", "127.0.0.1"]
//!
//! [pages]
//! public_only = ["login.html", "index.html"]
//! protected = ["dashboard.html", "create-invoice.html", "invoices.html"]
//! home = "dashboard.html"
//! login = "login.html"
//!
//! [messages]
//! dismiss_after_ms = 5000
//!
//! [firebase]
//! apiKey = "..."
//! authDomain = "billwise-invoicing.firebaseapp.com"
//! projectId = "billwise-invoicing"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`BillwiseConfig`] | Top-level config with TOML (de)serialisation. |
//! | [`SiteConfig`] | Hostname-based [`Environment`] detection and the base path used for every navigation target. |
//! | [`PagesConfig`] | Page classification: public-only pages, protected pages, and the two redirect targets. |
//! | [`MessagesConfig`] | How long a status message stays visible. |
//! | [`FirebaseConfig`] | Web app credentials, field names as the Firebase console prints them. |
//!
//! Every field has a default matching the production deployment, so a missing
//! or empty file is equivalent to the default configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `billwise.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BillwiseConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub pages: PagesConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
}

/// Where the site is deployed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
    Unknown,
}

/// Deployment settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Hostname that identifies the production deployment.
    #[serde(default = "default_production_host")]
    pub production_host: String,
    /// Path prefix of every page when served from `production_host`.
    #[serde(default = "default_production_base_path")]
    pub production_base_path: String,
    /// Hostnames treated as local development.
    #[serde(default = "default_development_hosts")]
    pub development_hosts: Vec<String>,
}

fn default_production_host() -> String {
    "bonellieric98-sys.github.io".to_string()
}

fn default_production_base_path() -> String {
    "/invoicing-project".to_string()
}

fn default_development_hosts() -> Vec<String> {
    vec!["localhost".to_string(), "127.0.0.1".to_string()]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            production_host: default_production_host(),
            production_base_path: default_production_base_path(),
            development_hosts: default_development_hosts(),
        }
    }
}

impl SiteConfig {
    /// Classify a hostname.
    pub fn environment(&self, hostname: &str) -> Environment {
        if hostname == self.production_host {
            Environment::Production
        } else if self.development_hosts.iter().any(|h| h == hostname) {
            Environment::Development
        } else {
            Environment::Unknown
        }
    }

    /// Base path for navigation targets when served from `hostname`.
    /// Empty everywhere except production.
    pub fn base_path(&self, hostname: &str) -> &str {
        match self.environment(hostname) {
            Environment::Production => &self.production_base_path,
            Environment::Development | Environment::Unknown => "",
        }
    }
}

/// Page classification used by the redirect policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Pages only meant for signed-out visitors.
    #[serde(default = "default_public_only")]
    pub public_only: Vec<String>,
    /// Pages that require a session.
    #[serde(default = "default_protected")]
    pub protected: Vec<String>,
    /// Where signed-in visitors land when they open a public-only page.
    #[serde(default = "default_home")]
    pub home: String,
    /// Where signed-out visitors land when they open a protected page.
    #[serde(default = "default_login")]
    pub login: String,
}

fn default_public_only() -> Vec<String> {
    vec!["login.html".to_string(), "index.html".to_string()]
}

fn default_protected() -> Vec<String> {
    vec![
        "dashboard.html".to_string(),
        "create-invoice.html".to_string(),
        "invoices.html".to_string(),
    ]
}

fn default_home() -> String {
    "dashboard.html".to_string()
}

fn default_login() -> String {
    "login.html".to_string()
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            public_only: default_public_only(),
            protected: default_protected(),
            home: default_home(),
            login: default_login(),
        }
    }
}

/// Status message settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// How long a message stays visible after the most recent call.
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

fn default_dismiss_after_ms() -> u64 {
    5000
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

impl MessagesConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

/// Firebase web app credentials.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub storage_bucket: String,
    #[serde(default)]
    pub messaging_sender_id: String,
    #[serde(default)]
    pub app_id: String,
}

impl BillwiseConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "billwise.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
