use std::fmt;

use super::error::{EdgarError, Result};
use super::search::ResultPage;

const HEAD_END: &str = "</head>";
const CIK_MARKER: &str = "CIK=";
const PARAM_DELIMITER: char = '&';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Accepts only non-empty, purely alphabetic symbols.
    pub fn new(ticker: &str) -> Option<Self> {
        if !ticker.is_empty() && ticker.chars().all(char::is_alphabetic) {
            Some(Ticker(ticker.to_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the caller searched for: a registrant CIK or a ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Cik(String),
    Ticker(Ticker),
}

impl Identifier {
    /// Entirely alphabetic input is a ticker; anything else is used as a CIK
    /// exactly as given.
    pub fn parse(input: &str) -> Self {
        match Ticker::new(input) {
            Some(ticker) => Identifier::Ticker(ticker),
            None => Identifier::Cik(input.to_string()),
        }
    }

    pub fn is_ticker(&self) -> bool {
        matches!(self, Identifier::Ticker(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Cik(cik) => write!(f, "{}", cik),
            Identifier::Ticker(ticker) => write!(f, "{}", ticker),
        }
    }
}

/// Reads the CIK a ticker search landed on from the links in the page head.
pub fn resolve_cik(ticker: &Ticker, page: &ResultPage) -> Result<String> {
    let head = page.html.split(HEAD_END).next().unwrap_or_default();

    let found = head
        .rfind(CIK_MARKER)
        .map(|pos| {
            let rest = &head[pos + CIK_MARKER.len()..];
            rest.split(PARAM_DELIMITER).next().unwrap_or_default()
        })
        .unwrap_or_default();

    if found.is_empty() || !found.chars().all(|c| c.is_ascii_digit()) {
        return Err(EdgarError::ResolutionFailed {
            ticker: ticker.to_string(),
            found: found.chars().take(40).collect(),
        });
    }

    log::debug!("Resolved ticker {} to CIK {}", ticker, found);
    Ok(found.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> ResultPage {
        ResultPage {
            start: 0,
            html: html.to_string(),
        }
    }

    fn tsla() -> Ticker {
        Ticker::new("tsla").unwrap()
    }

    #[test]
    fn test_identifier_heuristic() {
        assert!(Identifier::parse("tsla").is_ticker());
        assert!(Identifier::parse("AAPL").is_ticker());
        assert_eq!(
            Identifier::parse("0000320193"),
            Identifier::Cik("0000320193".to_string())
        );
        // digits or punctuation mean the input is not treated as a ticker
        assert!(!Identifier::parse("BRK-B").is_ticker());
        assert!(!Identifier::parse("").is_ticker());
    }

    #[test]
    fn test_resolve_takes_last_marker_in_head() {
        let html = r#"<html><head>
            <link rel="alternate" href="/cgi-bin/browse-edgar?action=getcompany&CIK=tsla&type=">
            <link rel="alternate" href="/cgi-bin/browse-edgar?action=getcompany&CIK=0001318605&type=&dateb=&owner=exclude&count=40&output=atom">
            </head><body><a href="?CIK=9999999999&x=1">x</a></body></html>"#;
        assert_eq!(resolve_cik(&tsla(), &page(html)).unwrap(), "0001318605");
    }

    #[test]
    fn test_resolve_without_marker_fails() {
        let html = "<html><head><title>No matching Ticker Symbol.</title></head></html>";
        let err = resolve_cik(&tsla(), &page(html)).unwrap_err();
        assert!(matches!(err, EdgarError::ResolutionFailed { ref found, .. } if found.is_empty()));
    }

    #[test]
    fn test_resolve_rejects_non_numeric() {
        let html = r#"<head><a href="?CIK=tsla&owner=exclude"></a></head>"#;
        let err = resolve_cik(&tsla(), &page(html)).unwrap_err();
        match err {
            EdgarError::ResolutionFailed { ticker, found } => {
                assert_eq!(ticker, "TSLA");
                assert_eq!(found, "tsla");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
