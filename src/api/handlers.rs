use super::AppState;
use crate::error::BudgetError;
use axum::{
    extract::{Json, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// 上传表单中文件字段的名称
pub const UPLOAD_FIELD: &str = "arquivo";

static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<String>,
}

impl ErrorResponse {
    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 上传报价单/采购清单，返回逐行匹配结果与总价
pub async fn upload_budget(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    // 1. 读取并落盘上传文件
    let saved = match save_upload(&state.upload_dir, &mut multipart).await {
        Ok(Some(path)) => path,
        Ok(None) => {
            return ErrorResponse {
                error: "Nenhum arquivo enviado.".to_string(),
                detalhes: None,
            }
            .into_response_with(StatusCode::BAD_REQUEST);
        }
        Err(response) => return response,
    };
    tracing::info!("收到上传文件: {}", saved.display());

    // 2. 处理
    let result = state.service.process_file(&saved).await;

    // 3. 无论成败都清理临时文件
    if let Err(e) = tokio::fs::remove_file(&saved).await {
        tracing::warn!("删除临时文件 {} 失败: {}", saved.display(), e);
    }

    match result {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            tracing::error!("处理 {} 失败: {}", saved.display(), e);
            ErrorResponse {
                error: "Erro ao processar orçamento.".to_string(),
                detalhes: Some(e.to_string()),
            }
            .into_response_with(status_for(&e))
        }
    }
}

/// 错误 -> HTTP 状态码
pub fn status_for(error: &BudgetError) -> StatusCode {
    match error {
        e if e.is_decode_failure() => StatusCode::UNPROCESSABLE_ENTITY,
        BudgetError::EmptyCatalog => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 找到文件字段并写入上传目录；没有文件时返回 `Ok(None)`
async fn save_upload(dir: &Path, multipart: &mut Multipart) -> Result<Option<PathBuf>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                let status = e.status();
                return Err(ErrorResponse {
                    error: "Upload inválido.".to_string(),
                    detalhes: Some(e.body_text()),
                }
                .into_response_with(status));
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(|e| {
            let status = e.status();
            ErrorResponse {
                error: "Upload inválido.".to_string(),
                detalhes: Some(e.body_text()),
            }
            .into_response_with(status)
        })?;

        let path = dir.join(upload_file_name(&original_name));
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            tracing::error!("写入上传文件 {} 失败: {}", path.display(), e);
            ErrorResponse {
                error: "Erro ao processar orçamento.".to_string(),
                detalhes: Some(e.to_string()),
            }
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        })?;
        return Ok(Some(path));
    }
}

/// `arquivo-<毫秒时间戳>-<序号><原扩展名>`，保留扩展名供格式路由使用
fn upload_file_name(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let seq = UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}-{}-{}{}",
        UPLOAD_FIELD,
        chrono::Utc::now().timestamp_millis(),
        seq,
        extension
    )
}
