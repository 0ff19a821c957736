// src/storage/mod.rs
use crate::pipeline::AnalysisResult;
use crate::utils::error::StorageError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    // Directory structure like: /base_dir/<cik>/
    fn target_dir(&self, result: &AnalysisResult) -> Result<PathBuf, StorageError> {
        let cik = result.cik.as_deref().unwrap_or("unknown");
        let target_dir = self.base_dir.join(cik);

        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the summary report as plain text
    pub fn save_summary(&self, result: &AnalysisResult) -> Result<PathBuf, StorageError> {
        let file_path = self
            .target_dir(result)?
            .join(format!("{}_summary.txt", result.analyzed_filing));

        let mut file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
        file.write_all(result.summary_report.as_bytes())
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved summary to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the full result record in JSON format, stamped with the save time
    pub fn save_result(&self, result: &AnalysisResult) -> Result<PathBuf, StorageError> {
        let file_path = self
            .target_dir(result)?
            .join(format!("{}_analysis.json", result.analyzed_filing));

        let document = serde_json::json!({
            "result": result,
            "savedAt": chrono::Utc::now().to_rfc3339(),
        });

        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved analysis to {}", file_path.display());
        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::FilingRecord;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            company_name: "Apple Inc.".to_string(),
            cik: Some("0000320193".to_string()),
            filings: vec![FilingRecord {
                accession_number: "0000320193-23-000106".to_string(),
                filing_date: "2023-11-03".to_string(),
                filing_url: "https://www.sec.gov/Archives/edgar/data/0000320193/000032019323000106/0000320193-23-000106-index.html".to_string(),
            }],
            analyzed_filing: "0000320193-23-000106".to_string(),
            summary_report: "Apple reported higher revenue.".to_string(),
            extracted_fields: None,
        }
    }

    #[test]
    fn test_save_result_and_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("output");
        let storage = StorageManager::new(&dir).unwrap();
        let result = sample_result();

        let summary_path = storage.save_summary(&result).unwrap();
        assert_eq!(summary_path, dir.join("0000320193").join("0000320193-23-000106_summary.txt"));
        assert_eq!(fs::read_to_string(&summary_path).unwrap(), "Apple reported higher revenue.");

        let json_path = storage.save_result(&result).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(saved["result"]["companyName"], "Apple Inc.");
        assert_eq!(saved["result"]["filings"][0]["filingDate"], "2023-11-03");
        assert!(saved["savedAt"].is_string());
    }
}
