//! # 자격 증명(Credential) 서비스
//!
//! 사용자 이름 + 비밀번호를 저장하고 검증합니다.
//! 비밀번호는 Argon2id로 해싱하며, 솔트는 사용자마다 `OsRng`로 새로 생성합니다.
//! 원문 비밀번호는 어디에도 저장하지 않습니다.

use crate::{db::users as db_users, error::AppError, models::User};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Username already exists")]
    DuplicateUser,
    /// 사용자가 없을 때와 비밀번호가 틀렸을 때를 구분하지 않습니다.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl CredentialError {
    pub fn code(&self) -> &'static str {
        match self {
            CredentialError::DuplicateUser => "duplicate_user",
            CredentialError::InvalidCredentials => "invalid_credentials",
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();
    Ok(hash)
}

/// 저장된 PHC 문자열과 비밀번호가 일치하는지 확인합니다.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 새 사용자를 등록합니다.
///
/// 같은 이름이 이미 있으면 `CredentialError::DuplicateUser`.
/// 사전 확인과 INSERT 사이에 다른 요청이 끼어들어도 UNIQUE 제약이 같은 에러로 막아 줍니다.
pub async fn register(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    if db_users::find_by_username(pool, username).await?.is_some() {
        return Err(CredentialError::DuplicateUser.into());
    }

    let password_hash = hash_password(password)?;
    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(pool, &user_id, username, &password_hash, now).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// 사용자 이름과 비밀번호를 검증하고, 일치하면 사용자를 반환합니다.
pub async fn verify(pool: &SqlitePool, username: &str, password: &str) -> Result<User, AppError> {
    let user = db_users::find_by_username(pool, username)
        .await?
        .ok_or(CredentialError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(CredentialError::InvalidCredentials.into());
    }

    Ok(user)
}
