//! # 비즈니스 로직 모듈
//!
//! - `credentials`: 비밀번호 해싱과 회원가입/로그인 검증
//! - `timer`: 작업 주간 상태 전이 에러와 경과 시간 계산 (DB 접근 없는 순수 함수)

pub mod credentials;
pub mod timer;
