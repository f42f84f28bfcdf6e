use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use url::Url;

use super::error::Result;
use super::identifier::Ticker;

/// One row of a company's filing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    #[serde(rename = "Filings")]
    pub form: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "FilingDate")]
    pub filing_date: String,
    #[serde(rename = "EffectiveDate")]
    pub effective_date: Option<String>,
    #[serde(rename = "FilmNo")]
    pub film_no: String,
    #[serde(rename = "AccessionNo")]
    pub accession_no: String,
    #[serde(rename = "URL")]
    pub url: String,
}

/// Full-submission text file of a filing:
/// `<archive>/<cik without leading zeros>/<accession without dashes>/<accession>.txt`.
pub fn document_url(archive_url: &Url, cik: &str, accession_no: &str) -> String {
    let base = archive_url.as_str();
    let separator = if base.ends_with('/') { "" } else { "/" };
    format!(
        "{}{}{}/{}/{}.txt",
        base,
        separator,
        cik.trim_start_matches('0'),
        accession_no.replace('-', ""),
        accession_no
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingHistory {
    pub cik: String,
    pub ticker: Option<String>,
    pub filings: Vec<FilingRecord>,
}

impl FilingHistory {
    pub fn new(
        cik: String,
        ticker: Option<&Ticker>,
        mut filings: Vec<FilingRecord>,
        archive_url: &Url,
    ) -> Self {
        for filing in &mut filings {
            filing.url = document_url(archive_url, &cik, &filing.accession_no);
        }
        FilingHistory {
            cik,
            ticker: ticker.map(|t| t.to_string()),
            filings,
        }
    }

    pub fn len(&self) -> usize {
        self.filings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filings.is_empty()
    }

    /// Filings whose form column matches `form` exactly.
    pub fn of_form<'a>(&'a self, form: &'a str) -> impl Iterator<Item = &'a FilingRecord> + 'a {
        self.filings.iter().filter(move |f| f.form == form)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
        for filing in &self.filings {
            writer.serialize(filing)?;
        }
        writer.flush()?;
        log::info!("Wrote {} filings to {:?}", self.filings.len(), path);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
