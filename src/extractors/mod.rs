// src/extractors/mod.rs
pub mod fields;
pub mod index_page;

// Re-export key extraction types for convenience
pub use fields::{ExtractedFields, Field, FieldExtractor};
pub use index_page::find_submission_text_link;
