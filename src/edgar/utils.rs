use reqwest::Client;
use url::Url;

use super::error::{EdgarError, Result};

/// GETs `url` and returns the body as text. `start` is the result offset the
/// request belongs to and only feeds error context.
pub async fn fetch_text(
    client: &Client,
    url: &Url,
    user_agent: &str,
    accept: &mime::Mime,
    start: usize,
) -> Result<String> {
    log::debug!("Fetching URL: {}", url);

    let response = client
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, user_agent)
        .header(reqwest::header::ACCEPT, accept.as_ref())
        .header(reqwest::header::ACCEPT_ENCODING, "gzip, deflate")
        .send()
        .await
        .map_err(|source| EdgarError::Http { start, source })?;

    log::debug!("Response status: {}", response.status());

    if !response.status().is_success() {
        return Err(EdgarError::Status {
            status: response.status(),
            start,
        });
    }

    let content = response
        .text()
        .await
        .map_err(|source| EdgarError::Http { start, source })?;
    log::debug!("Received content length: {}", content.len());

    Ok(content)
}
