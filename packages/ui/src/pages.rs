//! Page classification and redirect targets.

use std::collections::HashSet;

use store::config::PagesConfig;

/// Which pages need a session, which are for signed-out visitors only, and
/// where to send people who are on the wrong kind of page.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePolicy {
    base_path: String,
    public_only: HashSet<String>,
    protected: HashSet<String>,
    home_page: String,
    login_page: String,
}

impl PagePolicy {
    /// Build from the `[pages]` section and the base path of the current host.
    pub fn from_config(pages: &PagesConfig, base_path: &str) -> Self {
        let policy = Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            public_only: pages.public_only.iter().cloned().collect(),
            protected: pages.protected.iter().cloned().collect(),
            home_page: pages.home.clone(),
            login_page: pages.login.clone(),
        };
        for page in policy.public_only.intersection(&policy.protected) {
            tracing::warn!(page = %page, "page is both public-only and protected");
        }
        policy
    }

    /// Absolute path of `page` under the base path.
    pub fn url_for(&self, page: &str) -> String {
        format!("{}/{}", self.base_path, page)
    }

    pub fn is_public_only(&self, page: &str) -> bool {
        self.public_only.contains(page)
    }

    pub fn is_protected(&self, page: &str) -> bool {
        self.protected.contains(page)
    }

    /// Where a signed-in visitor on `page` should go, if anywhere.
    pub fn redirect_when_authenticated(&self, page: &str) -> Option<String> {
        self.is_public_only(page).then(|| self.url_for(&self.home_page))
    }

    /// Where a signed-out visitor on `page` should go, if anywhere.
    pub fn redirect_when_unauthenticated(&self, page: &str) -> Option<String> {
        self.is_protected(page).then(|| self.url_for(&self.login_page))
    }
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::from_config(&PagesConfig::default(), "")
    }
}

/// The page identifier of a location pathname: its last `/` segment.
///
/// `"/invoicing-project/login.html"` → `"login.html"`, `"/"` → `""`.
pub fn page_identifier(pathname: &str) -> &str {
    pathname.rsplit('/').next().unwrap_or(pathname)
}
