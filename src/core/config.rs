use anyhow::{anyhow, Result};
use url::Url;

pub const SEARCH_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar";
pub const ARCHIVE_URL: &str = "https://www.sec.gov/Archives/edgar/data/";
pub const DEFAULT_USER_AGENT: &str = "software@example.com";
pub const DEFAULT_MAX_PAGES: usize = 1000;

#[derive(Clone, Debug)]
pub struct EdgarConfig {
    pub search_url: Url,
    pub archive_url: Url,
    pub user_agent: String,
    /// Upper bound on result pages fetched for one company.
    pub max_pages: usize,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            search_url: Url::parse(SEARCH_URL).expect("static search url"),
            archive_url: Url::parse(ARCHIVE_URL).expect("static archive url"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl EdgarConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(user_agent) = std::env::var("USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(max_pages) = std::env::var("EDGAR_MAX_PAGES") {
            config.max_pages = max_pages
                .parse()
                .map_err(|e| anyhow!("EDGAR_MAX_PAGES must be a positive integer: {}", e))?;
            if config.max_pages == 0 {
                return Err(anyhow!("EDGAR_MAX_PAGES must be a positive integer"));
            }
        }

        Ok(config)
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = EdgarConfig::default();
        assert_eq!(config.search_url.as_str(), SEARCH_URL);
        assert_eq!(config.archive_url.as_str(), ARCHIVE_URL);
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
    }
}
