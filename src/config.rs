//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 모든 항목에 기본값이 있어 로컬 개발 환경에서는 환경변수 없이도 실행됩니다.
//! 단, 기본값은 **로컬 개발 전용**입니다. 특히 `JWT_SECRET`은 운영 환경에서
//! 반드시 직접 지정해야 합니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로
//! - `JWT_SECRET`: 로그인 토큰 서명에 사용할 비밀키
//! - `TOKEN_TTL_HOURS`: 로그인 토큰 유효 시간 (시간 단위)
//! - `HOST` / `PORT`: 서버 바인딩 주소와 포트
//! - `CORS_ORIGINS`: 허용할 프론트엔드 출처 목록 (쉼표로 구분)
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 정적 파일 디렉토리
//! - `DB_CONNECT_ATTEMPTS` / `DB_CONNECT_BACKOFF_SECS`: 시작 시 DB 연결 재시도 정책

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// 로그인 토큰 기본 유효 시간 (시간 단위)
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// 개발용 기본 서명 키. 운영 환경에서 이 값이 쓰이면 경고 로그를 남깁니다.
pub const DEV_JWT_SECRET: &str = "worktime-dev-secret-change-me";

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 필요한 값만 `AppState`로 옮겨 핸들러와 공유합니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:worktime.db?mode=rwc")
    pub database_url: String,
    /// 로그인 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 로그인 토큰 유효 시간 (기본값: 24시간). 실제 사용 값은 `token_ttl()`로 얻습니다.
    pub token_ttl_hours: i64,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8080)
    pub port: u16,
    /// CORS로 허용할 출처 목록 (기본값: ["http://localhost:3000"])
    pub cors_origins: Vec<String>,
    /// 프론트엔드 빌드 결과물 경로 (기본값: "../frontend/build")
    pub frontend_dist: String,
    /// 시작 시 DB 연결 시도 횟수 (기본값: 30)
    pub db_connect_attempts: u32,
    /// DB 연결 재시도 사이 대기 시간 (기본값: 2초)
    pub db_connect_backoff: Duration,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 숫자 항목의 파싱에 실패하면 해당 항목의 기본값을 사용합니다.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:worktime.db?mode=rwc".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8080),
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/build".to_string()),
            db_connect_attempts: parse_var("DB_CONNECT_ATTEMPTS", 30),
            db_connect_backoff: Duration::from_secs(parse_var("DB_CONNECT_BACKOFF_SECS", 2)),
        }
    }

    /// 로그인 토큰 유효 시간
    ///
    /// 0 이하이거나 `chrono::Duration`으로 표현할 수 없는 값이면 24시간을 사용합니다.
    pub fn token_ttl(&self) -> chrono::Duration {
        Some(self.token_ttl_hours)
            .filter(|hours| *hours > 0)
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    /// 개발용 기본 서명 키를 그대로 쓰고 있는지 여부
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

// 제네릭 함수: `T: FromStr`을 만족하는 모든 타입(u16, u32, i64 ...)에 대해 동작합니다.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// "a, b,,c" → ["a", "b", "c"]
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
