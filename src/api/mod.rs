pub mod handlers;

pub use handlers::*;

use crate::service::BudgetService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;

/// 共享状态：预算服务 + 上传目录
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BudgetService>,
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(service: BudgetService, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            service: Arc::new(service),
            upload_dir: Arc::new(upload_dir.into()),
        }
    }
}

/// 构建路由
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/orcamento", post(upload_budget))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_upload_bytes)))
}
