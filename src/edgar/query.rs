use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::identifier::{Identifier, Ticker};

pub const ACTION: &str = "getcompany";

/// Insider-filing scope of a company search.
///
/// Values outside the three known ones are kept as `Other` and sent as-is;
/// the search endpoint is the one that rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OwnerFilter {
    Include,
    #[default]
    Exclude,
    Only,
    Other(String),
}

impl fmt::Display for OwnerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerFilter::Include => write!(f, "include"),
            OwnerFilter::Exclude => write!(f, "exclude"),
            OwnerFilter::Only => write!(f, "only"),
            OwnerFilter::Other(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for OwnerFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "include" => OwnerFilter::Include,
            "exclude" => OwnerFilter::Exclude,
            "only" => OwnerFilter::Only,
            _ => OwnerFilter::Other(s.to_string()),
        })
    }
}

impl From<String> for OwnerFilter {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(owner) => owner,
            Err(never) => match never {},
        }
    }
}

impl From<OwnerFilter> for String {
    fn from(owner: OwnerFilter) -> Self {
        owner.to_string()
    }
}

/// A company filing search. Built once, never mutated; resolving a ticker
/// produces a new query through [`Query::with_cik`].
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    identifier: Identifier,
    ticker: Option<Ticker>,
    owner: OwnerFilter,
    form: Option<String>,
    before: Option<String>,
}

impl Query {
    pub fn new(identifier: Identifier) -> Self {
        Query {
            identifier,
            ticker: None,
            owner: OwnerFilter::default(),
            form: None,
            before: None,
        }
    }

    pub fn owner(mut self, owner: OwnerFilter) -> Self {
        self.owner = owner;
        self
    }

    /// Restricts results to one form type, e.g. `10-K` or `4`.
    pub fn form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    /// Only filings made on or before this `YYYY-MM-DD` date.
    pub fn before(mut self, date: impl Into<String>) -> Self {
        self.before = Some(date.into());
        self
    }

    pub fn before_date(self, date: NaiveDate) -> Self {
        self.before(date.format("%Y-%m-%d").to_string())
    }

    /// Replaces the identifier with a resolved CIK, remembering the ticker it
    /// was resolved from.
    pub fn with_cik(&self, cik: String) -> Self {
        let ticker = match &self.identifier {
            Identifier::Ticker(ticker) => Some(ticker.clone()),
            Identifier::Cik(_) => self.ticker.clone(),
        };
        Query {
            identifier: Identifier::Cik(cik),
            ticker,
            ..self.clone()
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn owner_filter(&self) -> &OwnerFilter {
        &self.owner
    }

    pub fn form_type(&self) -> Option<&str> {
        self.form.as_deref()
    }

    pub fn cutoff_date(&self) -> Option<&str> {
        self.before.as_deref()
    }

    pub fn params(&self, start: usize, count: usize) -> SearchParams {
        SearchParams {
            cik: self.identifier.to_string(),
            owner: self.owner.to_string(),
            dateb: self.before.clone(),
            form_type: self.form.clone(),
            count,
            start,
        }
    }
}

/// Parameters of one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub cik: String,
    pub owner: String,
    pub dateb: Option<String>,
    pub form_type: Option<String>,
    pub count: usize,
    pub start: usize,
}

impl SearchParams {
    /// Query string pairs in request order; absent filters are omitted.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("CIK", self.cik.clone()),
            ("action", ACTION.to_string()),
            ("owner", self.owner.clone()),
        ];
        if let Some(dateb) = &self.dateb {
            pairs.push(("dateb", dateb.clone()));
        }
        if let Some(form_type) = &self.form_type {
            pairs.push(("type", form_type.clone()));
        }
        pairs.push(("count", self.count.to_string()));
        pairs.push(("start", self.start.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_owner_filter_roundtrip() {
        assert_eq!("only".parse::<OwnerFilter>().unwrap(), OwnerFilter::Only);
        assert_eq!(OwnerFilter::default().to_string(), "exclude");
        let odd: OwnerFilter = "sometimes".parse().unwrap();
        assert_eq!(odd, OwnerFilter::Other("sometimes".to_string()));
        assert_eq!(odd.to_string(), "sometimes");
    }

    #[test]
    fn test_params_omit_absent_filters() {
        let query = Query::new(Identifier::parse("0000320193"));
        let pairs = query.params(0, 100).pairs();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["CIK", "action", "owner", "count", "start"]);
        assert_eq!(param(&pairs, "action"), Some("getcompany"));
        assert_eq!(param(&pairs, "owner"), Some("exclude"));
    }

    #[test]
    fn test_params_forward_filters_verbatim() {
        let query = Query::new(Identifier::parse("320193"))
            .owner(OwnerFilter::Only)
            .form("4")
            .before("2020-01-01");
        let pairs = query.params(200, 100).pairs();
        assert_eq!(param(&pairs, "owner"), Some("only"));
        assert_eq!(param(&pairs, "type"), Some("4"));
        assert_eq!(param(&pairs, "dateb"), Some("2020-01-01"));
        assert_eq!(param(&pairs, "start"), Some("200"));
        assert_eq!(param(&pairs, "count"), Some("100"));
    }

    #[test]
    fn test_before_date_format() {
        let date = NaiveDate::from_ymd_opt(2019, 3, 7).unwrap();
        let query = Query::new(Identifier::parse("320193")).before_date(date);
        assert_eq!(query.cutoff_date(), Some("2019-03-07"));
    }

    #[test]
    fn test_with_cik_keeps_ticker_and_filters() {
        let query = Query::new(Identifier::parse("tsla")).form("10-K");
        let resolved = query.with_cik("0001318605".to_string());
        assert_eq!(resolved.identifier().to_string(), "0001318605");
        assert_eq!(resolved.ticker().map(|t| t.as_str()), Some("TSLA"));
        assert_eq!(resolved.form_type(), Some("10-K"));
        // `query` itself is unchanged
        assert_eq!(query.identifier().to_string(), "TSLA");
    }
}
