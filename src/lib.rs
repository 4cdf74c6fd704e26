pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod extract;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{create_lazy_pool, create_pool};
pub use engine::{process, BudgetEngine, MatchingConfig, RuleTables};
pub use error::{BudgetError, Result};
pub use models::{BudgetReport, CatalogEntry, MatchResult};
pub use service::BudgetService;
