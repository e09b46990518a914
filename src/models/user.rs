//! # 사용자 모델 정의
//!
//! 회원가입/로그인에 쓰이는 요청·응답 구조체와 `users` 테이블 엔티티입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 사용자 엔티티 — DB의 `users` 테이블 한 행에 대응합니다.
///
/// 가입 이후에는 변경되지 않으며, 이 시스템에서 삭제되지도 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// 사용자 고유 식별자 (UUIDv7)
    pub id: String,
    pub username: String,
    /// Argon2id PHC 문자열. 응답 JSON에는 절대 포함하지 않습니다.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/register` 요청 본문
///
/// `#[serde(default)]`: 필드가 빠져 있으면 빈 문자열로 채웁니다.
/// 이렇게 하면 누락된 필드도 핸들러의 검증 로직에서 400으로 처리됩니다.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/login` 요청 본문
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
}
