use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::error::{EdgarError, Result};
use super::filing::FilingRecord;
use super::search::ResultPage;

pub const ACCESSION_MARKER: &str = "Acc-no:";

pub const FORM_COLUMN: &str = "Filings";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const FILING_DATE_COLUMN: &str = "Filing Date";
pub const EFFECTIVE_DATE_COLUMN: &str = "Filed/Effective";
pub const FILM_NO_COLUMN: &str = "File/Film Number";

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());
static ACCESSION_NO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}-\d{2}-\d{6}$").unwrap());

/// Cell text of one HTML table. The first row is taken as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Parses the last `<table>` of a page. Search result pages put the filing
/// list after the company header tables.
pub fn last_table(html: &str) -> Result<RawTable> {
    let document = Html::parse_document(html);
    let table = document
        .select(&TABLE)
        .last()
        .ok_or_else(|| EdgarError::layout(0, "no table on page"))?;

    let mut rows = table
        .select(&ROW)
        // skip rows of tables nested inside this one
        .filter(|row| owning_table(*row).map(|t| t.id()) == Some(table.id()))
        .map(|row| row.select(&CELL).map(cell_text).collect::<Vec<_>>());

    let headers = rows
        .next()
        .ok_or_else(|| EdgarError::layout(0, "filings table has no header row"))?;

    Ok(RawTable {
        headers,
        rows: rows.collect(),
    })
}

fn owning_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a combined description into the description proper and its
/// accession number.
///
/// The accession number is the first whitespace-delimited token after
/// `Acc-no:`; everything before the marker, trimmed, is the description.
pub fn split_accession(description: &str) -> Result<(String, String)> {
    let (text, rest) = description
        .split_once(ACCESSION_MARKER)
        .ok_or(EdgarError::MissingAccessionNumber { page: 0, row: 0 })?;

    let accession_no = rest
        .split_whitespace()
        .next()
        .ok_or(EdgarError::MissingAccessionNumber { page: 0, row: 0 })?;

    if !ACCESSION_NO.is_match(accession_no) {
        return Err(EdgarError::MalformedAccessionNumber {
            page: 0,
            row: 0,
            value: accession_no.to_string(),
        });
    }

    Ok((text.trim().to_string(), accession_no.to_string()))
}

/// Filing rows of all result pages, in page order then row order.
#[derive(Debug, Clone, Default)]
pub struct FilingTable {
    pub records: Vec<FilingRecord>,
}

struct Columns {
    form: Option<usize>,
    description: usize,
    filing_date: usize,
    effective_date: Option<usize>,
    film_no: Option<usize>,
}

impl Columns {
    fn locate(table: &RawTable) -> std::result::Result<Self, String> {
        let required = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| format!("missing `{}` column in {:?}", name, table.headers))
        };
        Ok(Columns {
            form: table.column(FORM_COLUMN),
            description: required(DESCRIPTION_COLUMN)?,
            filing_date: required(FILING_DATE_COLUMN)?,
            effective_date: table.column(EFFECTIVE_DATE_COLUMN),
            film_no: table.column(FILM_NO_COLUMN),
        })
    }

    fn width(&self) -> usize {
        [
            self.form,
            Some(self.description),
            Some(self.filing_date),
            self.effective_date,
            self.film_no,
        ]
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |i| i + 1)
    }
}

impl FilingTable {
    pub fn from_pages(pages: &[ResultPage]) -> Result<Self> {
        let mut table = FilingTable::default();
        for (index, page) in pages.iter().enumerate() {
            let raw = last_table(&page.html).map_err(|e| e.at(index, 0))?;
            table.append(index, &raw)?;
        }
        Ok(table)
    }

    /// Appends the rows of one page's filings table. URLs are left empty
    /// until the CIK is known.
    pub fn append(&mut self, page: usize, raw: &RawTable) -> Result<()> {
        let columns = Columns::locate(raw).map_err(|reason| EdgarError::layout(page, reason))?;
        let width = columns.width();

        for (row, cells) in raw.rows.iter().enumerate() {
            if cells.len() < width {
                return Err(EdgarError::layout(
                    page,
                    format!("row {} has {} cells, expected {}", row, cells.len(), width),
                ));
            }

            // accession number first, then the description cleanup
            let (description, accession_no) =
                split_accession(&cells[columns.description]).map_err(|e| e.at(page, row))?;

            let optional = |column: Option<usize>| {
                column
                    .map(|i| cells[i].clone())
                    .filter(|value| !value.is_empty())
            };

            self.records.push(FilingRecord {
                form: optional(columns.form).unwrap_or_default(),
                description,
                filing_date: cells[columns.filing_date].clone(),
                effective_date: optional(columns.effective_date),
                film_no: optional(columns.film_no).unwrap_or_default(),
                accession_no,
                url: String::new(),
            });
        }

        log::debug!("Page {} contributed {} filings", page, raw.rows.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
