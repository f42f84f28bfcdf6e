use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::*;
use edgar_filings::{EdgarConfig, FilingHistory, FilingIndex, Identifier, OwnerFilter, Query};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "filings-cli", about = "List a company's SEC EDGAR filing history")]
struct Opt {
    /// CIK or ticker symbol of the company
    identifier: String,

    /// Insider filings: include, exclude or only
    #[structopt(long, default_value = "exclude")]
    owner: OwnerFilter,

    /// Only this form type, e.g. 10-K or 4
    #[structopt(long)]
    form: Option<String>,

    /// Only filings on or before this date (YYYY-MM-DD)
    #[structopt(long, parse(try_from_str = parse_date))]
    before: Option<NaiveDate>,

    /// Stop after this many result pages
    #[structopt(long)]
    max_pages: Option<usize>,

    /// Write the filings to a CSV file
    #[structopt(long, parse(from_os_str))]
    csv: Option<PathBuf>,

    /// Print the filings as JSON instead of a table
    #[structopt(long)]
    json: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date `{}`, expected YYYY-MM-DD", s))
}

fn build_query(opt: &Opt) -> Query {
    let mut query = Query::new(Identifier::parse(&opt.identifier)).owner(opt.owner.clone());
    if let Some(form) = &opt.form {
        query = query.form(form.clone());
    }
    if let Some(date) = opt.before {
        query = query.before_date(date);
    }
    query
}

fn print_table(history: &FilingHistory) {
    let title = match &history.ticker {
        Some(ticker) => format!("{} (CIK {})", ticker, history.cik),
        None => format!("CIK {}", history.cik),
    };
    println!("{}", title.bold());

    for filing in &history.filings {
        println!(
            "{:<10} {} {} {}",
            filing.form.cyan(),
            filing.filing_date,
            filing.accession_no.yellow(),
            filing.description
        );
        println!("           {}", filing.url.dimmed());
    }
    println!("\n{} filings", history.len());
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::from_args();

    let mut config = EdgarConfig::from_env()?;
    if let Some(max_pages) = opt.max_pages {
        config = config.with_max_pages(max_pages);
    }

    let query = build_query(&opt);
    let index = FilingIndex::new(config)?;
    let history = index
        .filing_history(&query)
        .await
        .with_context(|| format!("failed to fetch filings for {}", opt.identifier))?;

    if let Some(path) = &opt.csv {
        history
            .write_csv(path)
            .with_context(|| format!("failed to write {:?}", path))?;
        eprintln!("{} {:?}", "Saved".green(), path);
    }

    if opt.json {
        println!("{}", history.to_json()?);
    } else if opt.csv.is_none() {
        print_table(&history);
    }

    Ok(())
}
