//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과, 이들을 URL에 연결한 API 라우터를 정의합니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `workweek`: 작업 주간 시작/일시정지/재개/종료와 조회

pub mod auth;
pub mod health;
pub mod workweek;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 전역 변수 대신 Axum의 State로 의존성을 주입합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 로그인 토큰 유효 시간
    pub token_ttl: chrono::Duration,
}

/// `/api` 아래에 마운트되는 모든 라우트
///
/// CORS, 요청 로깅, 정적 파일 서빙은 `main`에서 바깥에 덧씌웁니다.
pub fn api_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // 아래 라우트는 모두 핸들러 인자의 `AuthUser` 추출기로 보호됩니다.
    let workweek_routes = Router::new()
        .route("/workweek", get(workweek::get_work_week))
        .route("/workweek/history", get(workweek::get_history))
        .route("/workweek/start", post(workweek::start_week))
        .route("/workweek/end", post(workweek::end_week))
        .route("/workweek/pause", post(workweek::pause_week))
        .route("/workweek/resume", post(workweek::resume_week))
        .route("/workweek/current-time", get(workweek::current_time));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(workweek_routes)
        .route("/health", get(health::health_check))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}
