// src/extractors/index_page.rs
//! Finds the consolidated submission text file on a filing's `-index.html` page.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to compile ANCHOR_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

// Whole anchor text is the label (singular or plural)
static LABEL_EXACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^complete submission text files?$").expect("Failed to compile LABEL_EXACT_RE")
});

// Label appears somewhere in a table row (live EDGAR layout: description cell + filename link)
static LABEL_IN_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcomplete submission text files?\b").expect("Failed to compile LABEL_IN_ROW_RE")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

fn visible_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

fn resolve_href(element: ElementRef<'_>, host: &Url) -> Option<Url> {
    let href = element.value().attr("href")?.trim();
    match host.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("Ignoring unresolvable link '{}': {}", href, e);
            None
        }
    }
}

/// Returns the absolute URL of the "Complete submission text files" link, or
/// `None` when the page has no such link. Relative links are qualified
/// against `host`.
pub fn find_submission_text_link(html: &str, host: &Url) -> Option<Url> {
    let document = Html::parse_document(html);

    // 1. An anchor whose own text is the label
    for anchor in document.select(&ANCHOR_SELECTOR) {
        if LABEL_EXACT_RE.is_match(&visible_text(anchor)) {
            tracing::debug!("Found labelled submission text anchor");
            if let Some(url) = resolve_href(anchor, host) {
                return Some(url);
            }
        }
    }

    // 2. A table row carrying the label with the .txt file linked alongside
    for row in document.select(&ROW_SELECTOR) {
        if !LABEL_IN_ROW_RE.is_match(&visible_text(row)) {
            continue;
        }
        let txt_anchor = row.select(&ANCHOR_SELECTOR).find(|a| {
            a.value()
                .attr("href")
                .map(|href| href.trim().to_ascii_lowercase().ends_with(".txt"))
                .unwrap_or(false)
        });
        if let Some(url) = txt_anchor.and_then(|a| resolve_href(a, host)) {
            tracing::debug!("Found submission text link in labelled table row");
            return Some(url);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Url {
        Url::parse("https://www.sec.gov").unwrap()
    }

    #[test]
    fn test_labelled_anchor_relative_link() {
        let html = r#"<html><body>
            <a href="/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm">aapl-20230930.htm</a>
            <a href="/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt">Complete submission text files</a>
        </body></html>"#;

        let url = find_submission_text_link(html, &host()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt"
        );
    }

    #[test]
    fn test_label_match_ignores_case_and_spacing() {
        let html = r#"<a href="https://www.sec.gov/x/full.txt">
            COMPLETE   submission
            text file</a>"#;
        let url = find_submission_text_link(html, &host()).unwrap();
        assert_eq!(url.as_str(), "https://www.sec.gov/x/full.txt");
    }

    #[test]
    fn test_table_row_layout() {
        let html = r#"<table class="tableFile" summary="Document Format Files">
            <tr><th>Seq</th><th>Description</th><th>Document</th><th>Type</th></tr>
            <tr><td>1</td><td>10-K</td><td><a href="/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm">aapl-20230930.htm</a></td><td>10-K</td></tr>
            <tr><td>&nbsp;</td><td>Complete submission text file</td>
                <td><a href="/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt">0000320193-23-000106.txt</a></td><td>&nbsp;</td></tr>
        </table>"#;

        let url = find_submission_text_link(html, &host()).unwrap();
        assert!(url.as_str().ends_with("/0000320193-23-000106.txt"));
    }

    #[test]
    fn test_missing_link_is_none() {
        let html = r#"<html><body><a href="/foo.htm">Primary document</a><p>Complete submission text files</p></body></html>"#;
        assert!(find_submission_text_link(html, &host()).is_none());
    }
}
