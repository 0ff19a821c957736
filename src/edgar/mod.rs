// src/edgar/mod.rs
pub mod client;
pub mod filings;
pub mod models;

pub use client::{EdgarApi, EdgarClient};
pub use filings::FilingSelection;
pub use models::FilingRecord;
