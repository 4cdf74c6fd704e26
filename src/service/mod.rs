pub mod budget;
pub mod export;

pub use budget::BudgetService;
pub use export::export_to_csv;
