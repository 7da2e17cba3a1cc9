//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 종류를 하나의 닫힌 열거형으로 정의합니다.
//! HTTP 계층은 에러 메시지 문자열이 아니라 **variant(종류)** 로 상태 코드를 결정합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 엔티티가 존재하지 않음 (HTTP 404)
    /// 어떤 엔티티인지("user", "word", "session" 등)를 함께 담습니다.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 세션이 만료됨 (HTTP 401)
    #[error("Session expired")]
    SessionExpired,

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 잘못된 입력 (HTTP 400) — 사용자 이름 형식, 빈 단어 등
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 복습 품질 점수가 0~5 범위를 벗어남 (HTTP 400)
    #[error("Quality must be between 0 and 5, got {0}")]
    InvalidQuality(i64),

    /// 사용자의 학습 목록에 없는 단어를 복습하려고 함 (HTTP 404)
    #[error("Word is not in the study list")]
    NotInStudyList,

    /// 고유 키 중복 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 외부 사전 API 연결 실패 또는 예상치 못한 응답 (HTTP 502)
    #[error("Upstream dictionary error: {0}")]
    Transport(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환 (`?` 연산자 사용 가능)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500) — 사전 덤프 가져오기에서 발생
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 고유 제약 조건 위반이면 `Conflict`로, 그 외에는 `Database`로 변환합니다.
    ///
    /// sqlx가 제공하는 `is_unique_violation()`으로 판별하므로
    /// 드라이버 에러 메시지 문자열에 의존하지 않습니다.
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("{} already exists", what))
            }
            _ => AppError::Database(err),
        }
    }

    /// 에러 종류를 나타내는 고정 코드 문자열 (응답 본문의 `error.code`)
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::SessionExpired => "session_expired",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::BadRequest(_) => "bad_request",
            AppError::InvalidQuality(_) => "invalid_quality",
            AppError::NotInStudyList => "not_in_study_list",
            AppError::Conflict(_) => "conflict",
            AppError::Transport(_) => "upstream_error",
            AppError::Database(_) => "database_error",
            AppError::Io(_) => "io_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// 에러 종류에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::NotInStudyList => StatusCode::NOT_FOUND,
            AppError::SessionExpired | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::InvalidQuality(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                "An IO error occurred".to_string()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Transport(ref msg) => {
                tracing::warn!("Dictionary upstream failure: {}", msg);
                "The dictionary service is unavailable".to_string()
            }
            AppError::BadRequest(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::Conflict(ref msg) => msg.clone(),
            other => other.to_string(),
        };

        // 결과: { "error": { "code": "not_found", "message": "word not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
