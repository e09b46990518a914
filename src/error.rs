//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 도메인 에러(`CredentialError`, `TimerError`)는 각 서비스 모듈에 정의되어 있고,
//! `#[from]` 덕분에 핸들러에서 `?`만 쓰면 `AppError`로 변환됩니다.

use crate::services::{credentials::CredentialError, timer::TimerError};
use axum::{
    extract::rejection::JsonRejection,
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
    /// 잘못된 요청 (HTTP 400) — 필수 필드 누락 등 입력값 검증 실패
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 요청 본문이 JSON이 아니거나 필드 타입이 맞지 않음 (HTTP 400)
    /// Axum 기본 거부 응답(415/422, 평문 본문) 대신 공통 에러 형식으로 보냅니다.
    #[error("Invalid request body: {0}")]
    JsonRejection(#[from] JsonRejection),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 회원가입/로그인 실패
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// 타이머 상태 전이 조건 위반 (HTTP 400)
    #[error(transparent)]
    Timer(#[from] TimerError),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::JsonRejection(ref rejection) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                rejection.body_text(),
            ),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Credential(ref e) => {
                let status = match e {
                    CredentialError::DuplicateUser => StatusCode::CONFLICT,
                    CredentialError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                };
                (status, e.code(), e.to_string())
            }
            // 상태 전이 조건 위반은 모두 400
            AppError::Timer(ref e) => (StatusCode::BAD_REQUEST, e.code(), e.to_string()),
        };

        // 결과: { "error": { "code": "already_active", "message": "Week already started" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
