pub mod catalog;
pub mod decimal;
pub mod extraction;
pub mod report;

pub use catalog::CatalogEntry;
pub use extraction::ExtractionResult;
pub use report::{BudgetReport, MatchResult};
