// src/edgar/filings.rs
use crate::edgar::models::{FilingRecord, SubmissionIndex};
use crate::utils::error::EdgarError;

/// Form type of the annual report.
pub const ANNUAL_REPORT_FORM: &str = "10-K";

/// Which of a company's annual filings the pipeline analyzes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilingSelection {
    /// First annual filing in source order (EDGAR lists newest first).
    #[default]
    Latest,
    /// A specific filing by accession number.
    Accession(String),
}

/// Constructs the browsable index page URL of a filing.
/// Dashes are stripped from the accession number in the directory segment only.
pub fn filing_index_url(archives_base: &str, cik: &str, accession_number: &str) -> String {
    let acc_no_dashes = accession_number.replace('-', "");
    format!(
        "{}/{}/{}/{}-index.html",
        archives_base.trim_end_matches('/'),
        cik,
        acc_no_dashes,
        accession_number
    )
}

/// Keeps the annual-report entries of a submission index, in source order.
/// An empty result means the company has no 10-K on record; it is not an error.
pub fn filter_annual_filings(index: &SubmissionIndex, cik: &str, archives_base: &str) -> Vec<FilingRecord> {
    let recent = &index.filings.recent;

    if recent.form.len() != recent.accession_number.len() || recent.form.len() != recent.filing_date.len() {
        tracing::warn!(
            "Submission index for CIK {} has uneven arrays (form={}, accessionNumber={}, filingDate={}); using the common prefix",
            cik,
            recent.form.len(),
            recent.accession_number.len(),
            recent.filing_date.len()
        );
    }

    let filings: Vec<FilingRecord> = recent
        .form
        .iter()
        .zip(&recent.accession_number)
        .zip(&recent.filing_date)
        .filter(|((form, _), _)| form.as_str() == ANNUAL_REPORT_FORM)
        .map(|((_, accession), date)| FilingRecord {
            accession_number: accession.clone(),
            filing_date: date.clone(),
            filing_url: filing_index_url(archives_base, cik, accession),
        })
        .collect();

    tracing::debug!("{} of {} submissions for CIK {} are 10-K filings", filings.len(), recent.form.len(), cik);
    filings
}

/// Restricts filings to an inclusive filing-year range. With no bounds set
/// every filing is kept, including ones whose date does not parse.
pub fn filter_by_year(filings: Vec<FilingRecord>, start_year: Option<i32>, end_year: Option<i32>) -> Vec<FilingRecord> {
    if start_year.is_none() && end_year.is_none() {
        return filings;
    }

    filings
        .into_iter()
        .filter(|filing| match filing.year() {
            Some(year) => start_year.map_or(true, |s| year >= s) && end_year.map_or(true, |e| year <= e),
            None => {
                tracing::warn!("Dropping filing {} with unparseable date '{}'", filing.accession_number, filing.filing_date);
                false
            }
        })
        .collect()
}

/// Picks the filing to analyze from the annual filings of `cik`.
pub fn select_filing<'a>(
    filings: &'a [FilingRecord],
    selection: &FilingSelection,
    cik: &str,
) -> Result<&'a FilingRecord, EdgarError> {
    match selection {
        FilingSelection::Latest => filings
            .first()
            .ok_or_else(|| EdgarError::NoAnnualFilings(cik.to_string())),
        FilingSelection::Accession(accession) => filings
            .iter()
            .find(|f| f.accession_number == *accession)
            .ok_or_else(|| EdgarError::FilingNotFound(accession.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::client::EDGAR_ARCHIVES_BASE;
    use crate::edgar::models::{Filings, RecentFilings};

    fn index(rows: &[(&str, &str, &str)]) -> SubmissionIndex {
        SubmissionIndex {
            cik: "320193".into(),
            name: Some("Apple Inc.".into()),
            filings: Filings {
                recent: RecentFilings {
                    form: rows.iter().map(|r| r.0.to_string()).collect(),
                    accession_number: rows.iter().map(|r| r.1.to_string()).collect(),
                    filing_date: rows.iter().map(|r| r.2.to_string()).collect(),
                },
            },
        }
    }

    #[test]
    fn test_index_url_strips_dashes_only_in_directory() {
        assert_eq!(
            filing_index_url(EDGAR_ARCHIVES_BASE, "0000320193", "0000320193-23-000106"),
            "https://www.sec.gov/Archives/edgar/data/0000320193/000032019323000106/0000320193-23-000106-index.html"
        );
    }

    #[test]
    fn test_filter_keeps_source_order() {
        let idx = index(&[
            ("8-K", "0000320193-24-000001", "2024-02-01"),
            ("10-K", "0000320193-23-000106", "2023-11-03"),
            ("10-Q", "0000320193-23-000077", "2023-08-04"),
            ("10-K/A", "0000320193-23-000050", "2023-05-01"),
            ("10-K", "0000320193-22-000108", "2022-10-28"),
        ]);

        let filings = filter_annual_filings(&idx, "0000320193", EDGAR_ARCHIVES_BASE);
        let accessions: Vec<&str> = filings.iter().map(|f| f.accession_number.as_str()).collect();
        assert_eq!(accessions, vec!["0000320193-23-000106", "0000320193-22-000108"]);
        assert_eq!(filings[1].filing_date, "2022-10-28");
    }

    #[test]
    fn test_filter_without_annual_filings_is_empty() {
        let idx = index(&[("8-K", "0000320193-24-000001", "2024-02-01"), ("10-Q", "0000320193-23-000077", "2023-08-04")]);
        assert!(filter_annual_filings(&idx, "0000320193", EDGAR_ARCHIVES_BASE).is_empty());
    }

    #[test]
    fn test_filter_tolerates_uneven_arrays() {
        let mut idx = index(&[("10-K", "0000320193-23-000106", "2023-11-03")]);
        idx.filings.recent.form.push("10-K".into());
        let filings = filter_annual_filings(&idx, "0000320193", EDGAR_ARCHIVES_BASE);
        assert_eq!(filings.len(), 1);
    }

    #[test]
    fn test_filter_by_year_range() {
        let idx = index(&[
            ("10-K", "a-23", "2023-11-03"),
            ("10-K", "a-22", "2022-10-28"),
            ("10-K", "a-21", "2021-10-29"),
        ]);
        let filings = filter_annual_filings(&idx, "0000320193", EDGAR_ARCHIVES_BASE);

        let kept = filter_by_year(filings.clone(), Some(2022), None);
        assert_eq!(kept.len(), 2);

        let kept = filter_by_year(filings.clone(), Some(2021), Some(2021));
        assert_eq!(kept[0].accession_number, "a-21");

        assert_eq!(filter_by_year(filings, None, None).len(), 3);
    }

    #[test]
    fn test_select_filing() {
        let idx = index(&[("10-K", "a-23", "2023-11-03"), ("10-K", "a-22", "2022-10-28")]);
        let filings = filter_annual_filings(&idx, "0000320193", EDGAR_ARCHIVES_BASE);

        let latest = select_filing(&filings, &FilingSelection::Latest, "0000320193").unwrap();
        assert_eq!(latest.accession_number, "a-23");

        let chosen = select_filing(&filings, &FilingSelection::Accession("a-22".into()), "0000320193").unwrap();
        assert_eq!(chosen.filing_date, "2022-10-28");

        let missing = select_filing(&filings, &FilingSelection::Accession("zzz".into()), "0000320193");
        assert!(matches!(missing, Err(EdgarError::FilingNotFound(_))));

        let none = select_filing(&[], &FilingSelection::Latest, "0000320193");
        assert!(matches!(none, Err(EdgarError::NoAnnualFilings(_))));
    }
}
