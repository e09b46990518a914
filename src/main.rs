//! # worktime 웹 서버 진입점
//!
//! 개인 작업 시간 기록 서비스의 백엔드입니다.
//! 사용자는 회원가입/로그인 후 "작업 주간"을 시작, 일시정지, 재개, 종료하고,
//! 경과 시간은 서버가 계산합니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 (준비될 때까지 재시도)
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터 + CORS + 정적 파일 설정
//! 6. HTTP 서버 시작

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use config::Config;
use routes::AppState;
use std::{path::Path, time::Duration};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 (.env 파일이 없어도 괜찮음) ──
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 worktime, tower_http, axum을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worktime=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting worktime server on {}:{}", config.host, config.port);
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development default");
    }

    // ── 3단계: DB 연결 ──
    // DB 컨테이너가 늦게 뜨는 경우를 위해 정해진 횟수만큼 재시도합니다.
    let pool = db::connect_with_retry(
        &config.database_url,
        config.db_connect_attempts,
        config.db_connect_backoff,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to connect to database after {} attempts",
            config.db_connect_attempts
        )
    })?;

    // ── 4단계: 마이그레이션 ──
    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 바이너리에 포함합니다.
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 5단계: 라우터 구성 ──
    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        token_ttl: config.token_ttl(),
    };

    let cors = cors_layer(&config.cors_origins);

    // 빌드된 프론트엔드가 있으면 같은 서버에서 서빙합니다 (SPA이므로 index.html로 폴백).
    let frontend_dist = Path::new(&config.frontend_dist);
    let app = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", config.frontend_dist);

        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));

        Router::new()
            .merge(routes::api_router(state))
            .fallback_service(serve_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");

        routes::api_router(state)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    };

    // ── 6단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 설정된 출처만 허용하는 CORS 레이어
///
/// 자격 증명(credentials)을 허용하면 `Any`를 쓸 수 없으므로
/// 메서드와 헤더도 명시적으로 나열합니다.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}
