//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `user`: 사용자(User)와 인증 요청/응답 구조체
//! - `work_week`: 작업 주간(WorkWeek)과 타이머 API 응답 구조체
//!
//! `pub use X::*;`로 재공개하여 `crate::models::WorkWeek`처럼 짧게 접근합니다.

pub mod user;
pub mod work_week;

pub use user::*;
pub use work_week::*;
