// src/extractors/fields.rs
//! Best-effort lookup of a fixed set of tags in filing markup.
//!
//! Each canonical [`Field`] owns a short list of candidate tag names (the
//! metadata schema, the SGML header, and the ad-hoc financial tags). Lookups
//! are independent and total: a missing tag leaves the field empty. Values are
//! carried as raw text, no numeric parsing.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    AccessionNumber,
    Cik,
    Registrant,
    Sic,
    PublicFloat,
    FilerStatus,
    FiscalYearEnd,
    Revenue,
    NetIncome,
    Assets,
    Liabilities,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::AccessionNumber,
        Field::Cik,
        Field::Registrant,
        Field::Sic,
        Field::PublicFloat,
        Field::FilerStatus,
        Field::FiscalYearEnd,
        Field::Revenue,
        Field::NetIncome,
        Field::Assets,
        Field::Liabilities,
    ];

    /// Human-readable label used in reports and summary prompts.
    pub fn label(self) -> &'static str {
        match self {
            Field::AccessionNumber => "Accession Number",
            Field::Cik => "CIK",
            Field::Registrant => "Registrant",
            Field::Sic => "SIC",
            Field::PublicFloat => "Public Float",
            Field::FilerStatus => "Accelerated Filer Status",
            Field::FiscalYearEnd => "Fiscal Year End",
            Field::Revenue => "Revenue",
            Field::NetIncome => "Net Income",
            Field::Assets => "Assets",
            Field::Liabilities => "Liabilities",
        }
    }

    /// Name accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Field::AccessionNumber => "accession-number",
            Field::Cik => "cik",
            Field::Registrant => "registrant",
            Field::Sic => "sic",
            Field::PublicFloat => "public-float",
            Field::FilerStatus => "filer-status",
            Field::FiscalYearEnd => "fiscal-year-end",
            Field::Revenue => "revenue",
            Field::NetIncome => "net-income",
            Field::Assets => "assets",
            Field::Liabilities => "liabilities",
        }
    }

    /// Tag names tried in order; the first one present with text wins.
    pub fn candidate_tags(self) -> &'static [&'static str] {
        match self {
            Field::AccessionNumber => &["adsh", "accession-number"],
            Field::Cik => &["cik"],
            Field::Registrant => &["name", "conformed-name"],
            Field::Sic => &["sic", "assigned-sic"],
            Field::PublicFloat => &["pubfloatusd"],
            Field::FilerStatus => &["afs"],
            Field::FiscalYearEnd => &["fye", "fiscal-year-end"],
            Field::Revenue => &["revenue", "revenues"],
            Field::NetIncome => &["net_income", "netincomeloss"],
            Field::Assets => &["assets"],
            Field::Liabilities => &["liabilities"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
                format!("unknown field '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Structured facts pulled out of a filing. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accession_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cik: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_float: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filer_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liabilities: Option<String>,
}

impl ExtractedFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::AccessionNumber => &mut self.accession_number,
            Field::Cik => &mut self.cik,
            Field::Registrant => &mut self.registrant,
            Field::Sic => &mut self.sic,
            Field::PublicFloat => &mut self.public_float,
            Field::FilerStatus => &mut self.filer_status,
            Field::FiscalYearEnd => &mut self.fiscal_year_end,
            Field::Revenue => &mut self.revenue,
            Field::NetIncome => &mut self.net_income,
            Field::Assets => &mut self.assets,
            Field::Liabilities => &mut self.liabilities,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::AccessionNumber => &self.accession_number,
            Field::Cik => &self.cik,
            Field::Registrant => &self.registrant,
            Field::Sic => &self.sic,
            Field::PublicFloat => &self.public_float,
            Field::FilerStatus => &self.filer_status,
            Field::FiscalYearEnd => &self.fiscal_year_end,
            Field::Revenue => &self.revenue,
            Field::NetIncome => &self.net_income,
            Field::Assets => &self.assets,
            Field::Liabilities => &self.liabilities,
        };
        value.as_deref()
    }

    pub fn set(&mut self, field: Field, value: String) {
        *self.slot(field) = Some(value);
    }

    /// Populated fields in canonical order.
    pub fn present(&self) -> Vec<(Field, &str)> {
        Field::ALL
            .iter()
            .filter_map(|&f| self.get(f).map(|v| (f, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }
}

pub struct FieldExtractor {
    lookups: Vec<(Field, Vec<Selector>)>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::with_fields(&Field::ALL)
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor that only looks up the given fields.
    pub fn with_fields(fields: &[Field]) -> Self {
        let lookups = fields
            .iter()
            .map(|&field| {
                let selectors = field
                    .candidate_tags()
                    .iter()
                    .filter_map(|tag| match Selector::parse(tag) {
                        Ok(sel) => Some(sel),
                        Err(e) => {
                            tracing::warn!("Skipping unusable tag selector '{}': {:?}", tag, e);
                            None
                        }
                    })
                    .collect();
                (field, selectors)
            })
            .collect();

        Self { lookups }
    }

    /// Parses `markup` as a tag tree and fills every field whose tag is present.
    pub fn extract(&self, markup: &str) -> ExtractedFields {
        let document = Html::parse_document(markup);
        let mut extracted = ExtractedFields::default();

        for (field, selectors) in &self.lookups {
            let value = selectors.iter().find_map(|sel| {
                document
                    .select(sel)
                    .find_map(element_value)
            });
            match value {
                Some(v) => {
                    tracing::debug!("Extracted {}: {}", field.label(), v);
                    extracted.set(*field, v);
                }
                None => tracing::trace!("No tag found for {}", field.label()),
            }
        }

        tracing::info!("Extracted {} of {} fields", extracted.present().len(), self.lookups.len());
        extracted
    }
}

// SGML header tags are often unclosed, so the parser nests every following
// tag inside them. Such an element's value is its own text, not its subtree's.
fn element_value(element: ElementRef<'_>) -> Option<String> {
    let has_child_elements = element.children().any(|node| node.value().is_element());
    let text: String = if has_child_elements {
        element
            .children()
            .filter_map(|node| node.value().as_text().map(|t| &**t))
            .collect()
    } else {
        element.text().collect()
    };

    let value = text.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_recognized_tags_gives_empty_record() {
        let extracted = FieldExtractor::new().extract("<html><body><p>Annual report</p></body></html>");
        assert!(extracted.is_empty());
        assert_eq!(extracted, ExtractedFields::default());
    }

    #[test]
    fn test_only_cik_tag() {
        let extracted = FieldExtractor::new().extract("<cik>123</cik>");
        assert_eq!(
            extracted,
            ExtractedFields {
                cik: Some("123".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(serde_json::to_string(&extracted).unwrap(), r#"{"cik":"123"}"#);
    }

    #[test]
    fn test_metadata_and_financial_tags() {
        let markup = r#"
            <submission>
              <adsh>0000320193-23-000106</adsh>
              <cik>320193</cik>
              <name>Apple Inc.</name>
              <sic>3571</sic>
              <pubfloatusd>2591165000000</pubfloatusd>
              <afs>1-LAF</afs>
              <fye>0930</fye>
            </submission>
            <financials>
              <revenue>383,285</revenue>
              <net_income>96,995</net_income>
              <assets>352,583</assets>
              <liabilities>290,437</liabilities>
            </financials>
        "#;

        let extracted = FieldExtractor::new().extract(markup);
        assert_eq!(extracted.accession_number.as_deref(), Some("0000320193-23-000106"));
        assert_eq!(extracted.registrant.as_deref(), Some("Apple Inc."));
        assert_eq!(extracted.filer_status.as_deref(), Some("1-LAF"));
        assert_eq!(extracted.fiscal_year_end.as_deref(), Some("0930"));
        assert_eq!(extracted.revenue.as_deref(), Some("383,285"));
        assert_eq!(extracted.net_income.as_deref(), Some("96,995"));
        assert_eq!(extracted.liabilities.as_deref(), Some("290,437"));
        assert_eq!(extracted.present().len(), 11);
    }

    #[test]
    fn test_unclosed_sgml_header_tags() {
        let markup = "<SUBMISSION>\n<ACCESSION-NUMBER>0000320193-23-000106\n<TYPE>10-K\n<FILER>\n<COMPANY-DATA>\n<CONFORMED-NAME>Apple Inc.\n<CIK>0000320193\n<ASSIGNED-SIC>3571\n<FISCAL-YEAR-END>0930\n</COMPANY-DATA>\n</FILER>\n</SUBMISSION>";

        let extracted = FieldExtractor::new().extract(markup);
        assert_eq!(extracted.accession_number.as_deref(), Some("0000320193-23-000106"));
        assert_eq!(extracted.registrant.as_deref(), Some("Apple Inc."));
        assert_eq!(extracted.cik.as_deref(), Some("0000320193"));
        assert_eq!(extracted.sic.as_deref(), Some("3571"));
        assert_eq!(extracted.fiscal_year_end.as_deref(), Some("0930"));
        assert!(extracted.revenue.is_none());
    }

    #[test]
    fn test_closed_multiline_tags_keep_full_text() {
        let extracted = FieldExtractor::new()
            .extract("<name>Apple\n  Inc.</name><revenue>\n383,285\n(in millions)\n</revenue>");
        assert_eq!(extracted.registrant.as_deref(), Some("Apple\n  Inc."));
        assert_eq!(extracted.revenue.as_deref(), Some("383,285\n(in millions)"));
    }

    #[test]
    fn test_empty_tag_left_absent() {
        let extracted = FieldExtractor::new().extract("<revenue>   </revenue><assets>10</assets>");
        assert!(extracted.revenue.is_none());
        assert_eq!(extracted.assets.as_deref(), Some("10"));
    }

    #[test]
    fn test_restricted_field_set() {
        let extractor = FieldExtractor::with_fields(&[Field::Revenue]);
        let extracted = extractor.extract("<cik>123</cik><revenue>5</revenue>");
        assert_eq!(extracted.present(), vec![(Field::Revenue, "5")]);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("net_income".parse::<Field>().unwrap(), Field::NetIncome);
        assert_eq!("Public-Float".parse::<Field>().unwrap(), Field::PublicFloat);
        assert!("ebitda".parse::<Field>().is_err());
    }
}
