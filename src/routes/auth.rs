//! # 인증 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/register | `register` | 회원가입 → 201 `{ message, user_id }` |
//! | POST | /api/login | `login` | 로그인 → 200 `{ token, user_id, username }` |
//!
//! 토큰은 서버에 저장하지 않으므로 로그아웃은 클라이언트가 토큰을 버리는 것으로 끝납니다.

use crate::{
    error::AppError,
    middleware::auth::issue_token,
    models::user::*,
    routes::AppState,
    services::credentials,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(req) = payload?;
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = credentials::register(&state.pool, &req.username, &req.password, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user_id: user.id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;
    let user = credentials::verify(&state.pool, &req.username, &req.password).await?;

    let token = issue_token(&user.id, &state.jwt_secret, state.token_ttl)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    tracing::debug!(user_id = %user.id, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}
