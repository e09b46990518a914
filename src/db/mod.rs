//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)와 서비스(services/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `users`: 사용자 생성/조회 쿼리
//! - `work_weeks`: 작업 주간의 상태 전이와 조회 쿼리

pub mod users;
pub mod work_weeks;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::time::Duration;

/// 데이터베이스에 연결될 때까지 최대 `attempts`번 시도합니다.
///
/// 컨테이너 환경에서는 DB가 서버보다 늦게 준비될 수 있으므로,
/// 실패하면 `backoff`만큼 기다렸다가 다시 시도합니다.
/// 애플리케이션에서 재시도를 하는 곳은 여기 한 군데뿐입니다.
pub async fn connect_with_retry(
    database_url: &str,
    attempts: u32,
    backoff: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    attempts,
                    error = %e,
                    "Waiting for database..."
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 마이그레이션이 적용된 메모리 DB (테스트 전용)
///
/// `sqlite::memory:`는 연결마다 별개의 DB가 생기므로 연결을 하나로 고정합니다.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_with_retry_gives_up_after_attempts() {
        // 존재하지 않는 디렉토리 아래의 파일은 mode=rwc여도 열 수 없습니다.
        let result = connect_with_retry(
            "sqlite:/nonexistent-dir/worktime/test.db?mode=rwc",
            2,
            Duration::from_millis(10),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn connect_with_retry_succeeds_immediately() {
        let pool = connect_with_retry("sqlite::memory:", 3, Duration::from_millis(10))
            .await
            .unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
