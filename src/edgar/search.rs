use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::error::{EdgarError, Result};
use super::query::{Query, SearchParams};
use super::utils::fetch_text;

/// Rows per result page; the most the search endpoint will return.
pub const PAGE_SIZE: usize = 100;
/// Appears once per filing row.
pub const ROW_MARKER: &str = "Acc-no";

/// Raw HTML of one search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage {
    pub start: usize,
    pub html: String,
}

impl ResultPage {
    pub fn row_markers(&self) -> usize {
        self.html.matches(ROW_MARKER).count()
    }

    /// A page with fewer rows than requested is the last one.
    pub fn is_last(&self) -> bool {
        self.row_markers() < PAGE_SIZE
    }
}

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, params: &SearchParams) -> Result<String>;
}

pub struct HttpPageSource {
    client: Client,
    search_url: Url,
    user_agent: String,
}

impl HttpPageSource {
    pub fn new(client: Client, search_url: Url, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            search_url,
            user_agent: user_agent.into(),
        }
    }

    pub fn request_url(&self, params: &SearchParams) -> Result<Url> {
        request_url(&self.search_url, params)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, params: &SearchParams) -> Result<String> {
        let url = self.request_url(params)?;
        fetch_text(
            &self.client,
            &url,
            &self.user_agent,
            &mime::TEXT_HTML,
            params.start,
        )
        .await
    }
}

pub fn request_url(search_url: &Url, params: &SearchParams) -> Result<Url> {
    Ok(Url::parse_with_params(search_url.as_str(), params.pairs())?)
}

/// Fetches result pages from offset 0 until a short page comes back.
///
/// Fails with [`EdgarError::PageLimitExceeded`] when `max_pages` full pages
/// have been fetched without reaching the end.
pub async fn paginate<S>(source: &S, query: &Query, max_pages: usize) -> Result<Vec<ResultPage>>
where
    S: PageSource + ?Sized,
{
    let mut pages = Vec::new();

    for index in 0..max_pages {
        let params = query.params(index * PAGE_SIZE, PAGE_SIZE);
        let html = source.fetch_page(&params).await?;
        let page = ResultPage {
            start: params.start,
            html,
        };

        let rows = page.row_markers();
        log::debug!("Page {} (start={}) has {} rows", index, params.start, rows);

        let last = page.is_last();
        pages.push(page);
        if last {
            return Ok(pages);
        }
    }

    log::warn!(
        "Search for {} still returning full pages after {} pages",
        query.identifier(),
        max_pages
    );
    Err(EdgarError::PageLimitExceeded { limit: max_pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::identifier::Identifier;
    use crate::edgar::query::OwnerFilter;

    #[test]
    fn test_row_markers() {
        let page = ResultPage {
            start: 0,
            html: "Acc-no: 1 Acc-no: 2 acc-no".to_string(),
        };
        assert_eq!(page.row_markers(), 2);
        assert!(page.is_last());
    }

    #[test]
    fn test_request_url_carries_params_verbatim() {
        let search_url = Url::parse("https://www.sec.gov/cgi-bin/browse-edgar").unwrap();
        let query = Query::new(Identifier::parse("0000320193"))
            .owner(OwnerFilter::Only)
            .form("10-K");
        let url = request_url(&search_url, &query.params(100, PAGE_SIZE)).unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("CIK".to_string(), "0000320193".to_string()),
                ("action".to_string(), "getcompany".to_string()),
                ("owner".to_string(), "only".to_string()),
                ("type".to_string(), "10-K".to_string()),
                ("count".to_string(), "100".to_string()),
                ("start".to_string(), "100".to_string()),
            ]
        );
        assert_eq!(url.path(), "/cgi-bin/browse-edgar");
    }
}
