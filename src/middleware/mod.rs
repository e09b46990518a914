//! # 미들웨어 모듈
//!
//! - `auth`: Bearer 토큰 발급/검증과 `AuthUser` 추출기(Extractor)

pub mod auth;
