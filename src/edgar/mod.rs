pub mod error;
pub mod filing;
pub mod identifier;
pub mod query;
pub mod search;
pub mod table;
mod utils;

pub use error::{EdgarError, Result};
pub use filing::{document_url, FilingHistory, FilingRecord};
pub use identifier::{Identifier, Ticker};
pub use query::{OwnerFilter, Query, SearchParams};
pub use search::{HttpPageSource, PageSource, ResultPage, PAGE_SIZE};
pub use table::FilingTable;

use reqwest::Client;

use crate::core::config::EdgarConfig;

/// Filing history lookups against the EDGAR company browse pages.
pub struct FilingIndex<S = HttpPageSource> {
    config: EdgarConfig,
    source: S,
}

impl FilingIndex<HttpPageSource> {
    pub fn new(config: EdgarConfig) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .build()
            .map_err(|source| EdgarError::Http { start: 0, source })?;
        let source =
            HttpPageSource::new(client, config.search_url.clone(), config.user_agent.clone());
        Ok(Self { config, source })
    }
}

impl<S: PageSource> FilingIndex<S> {
    pub fn with_source(config: EdgarConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &EdgarConfig {
        &self.config
    }

    /// Fetches every result page for `query`, resolves a ticker to its CIK
    /// and returns the filings with their document URLs.
    pub async fn filing_history(&self, query: &Query) -> Result<FilingHistory> {
        log::info!(
            "Searching filings for {} (owner={}, form={}, before={})",
            query.identifier(),
            query.owner_filter(),
            query.form_type().unwrap_or("any"),
            query.cutoff_date().unwrap_or("-"),
        );

        let pages = search::paginate(&self.source, query, self.config.max_pages).await?;

        let query = match query.identifier() {
            Identifier::Ticker(ticker) => {
                let first = pages
                    .first()
                    .ok_or_else(|| EdgarError::layout(0, "search returned no pages"))?;
                let cik = identifier::resolve_cik(ticker, first)?;
                query.with_cik(cik)
            }
            Identifier::Cik(_) => query.clone(),
        };

        let table = FilingTable::from_pages(&pages)?;
        log::info!(
            "Found {} filings for {} across {} pages",
            table.len(),
            query.identifier(),
            pages.len()
        );

        Ok(FilingHistory::new(
            query.identifier().to_string(),
            query.ticker(),
            table.records,
            &self.config.archive_url,
        ))
    }
}
