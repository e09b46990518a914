//! # 작업 주간 데이터베이스 쿼리 모듈
//!
//! 작업 주간의 생성, 상태 전이, 조회를 담당하는 SQL 쿼리 함수들입니다.
//!
//! ## 상태 전이와 WHERE 조건
//! ```text
//! start_week()  : 활성 주간이 없을 때만 INSERT (status = 'running')
//! pause_week()  : WHERE user_id = ? AND week_end IS NULL AND status = 'running'
//! resume_week() : WHERE user_id = ? AND week_end IS NULL AND status = 'paused'
//! end_week()    : WHERE user_id = ? AND week_end IS NULL
//! ```
//!
//! 모든 변경은 UPDATE 한 문장으로 끝나며, 영향받은 행이 0개이면
//! 상태 조건을 만족하지 못한 것으로 보고 `TimerError`를 반환합니다.
//! 동시에 같은 요청이 두 번 들어와도 WHERE 조건 덕분에 한 번만 적용됩니다.
//!
//! "현재 시각"은 호출하는 쪽에서 `now`로 넘겨 줍니다.

use crate::error::AppError;
use crate::models::{WorkWeek, WorkWeekSummary};
use crate::services::timer::{pause_duration, TimerError};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// 이력 조회 시 최대 행 수
pub const HISTORY_LIMIT: i64 = 50;

// created_at은 정렬에만 쓰므로 구조체로 읽어오지 않습니다.
const WORK_WEEK_COLUMNS: &str = "id, user_id, week_start, week_end, last_update_time, status, \
     pause_start, total_pause_time, week_goal_minutes";

/// 새 작업 주간을 시작합니다 (status = running).
///
/// 이미 활성 주간(week_end IS NULL)이 있으면 상태와 관계없이 `TimerError::AlreadyActive`.
/// 확인과 INSERT 사이의 경쟁은 부분 UNIQUE 인덱스(`idx_work_weeks_one_active`)가 막습니다.
pub async fn start_week(
    pool: &SqlitePool,
    user_id: &str,
    goal_minutes: i64,
    now: DateTime<Utc>,
) -> Result<WorkWeek, AppError> {
    if find_active(pool, user_id).await?.is_some() {
        return Err(TimerError::AlreadyActive.into());
    }

    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO work_weeks
            (id, user_id, week_start, last_update_time, status, total_pause_time,
             week_goal_minutes, created_at)
        VALUES (?, ?, ?, ?, 'running', 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .bind(goal_minutes)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::from(TimerError::AlreadyActive)
        }
        other => AppError::from(other),
    })?;

    get_work_week(pool, &id)
        .await?
        .ok_or(AppError::Internal(
            "Failed to retrieve created work week".to_string(),
        ))
}

/// 활성 주간을 종료합니다. running/paused 어느 상태든 종료할 수 있습니다.
///
/// 진행 중이던 일시정지는 total_pause_time에 확정되지 않고 그대로 버려집니다.
pub async fn end_week(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE work_weeks
        SET week_end = ?, last_update_time = ?, status = 'stopped'
        WHERE user_id = ? AND week_end IS NULL
        "#,
    )
    .bind(now)
    .bind(now)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(TimerError::NoActiveWeek.into());
    }
    Ok(())
}

/// running 상태의 활성 주간을 일시정지합니다.
pub async fn pause_week(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE work_weeks
        SET status = 'paused', pause_start = ?, last_update_time = ?
        WHERE user_id = ? AND week_end IS NULL AND status = 'running'
        "#,
    )
    .bind(now)
    .bind(now)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(TimerError::NotRunning.into());
    }
    Ok(())
}

/// paused 상태의 활성 주간을 재개하고, 이번 일시정지 시간을 누적합니다.
///
/// 읽기(pause_start, total_pause_time) → 쓰기의 두 단계입니다.
/// 두 문장 사이에 같은 사용자의 재개 요청이 겹치면 UPDATE의 `status = 'paused'`
/// 조건 때문에 하나만 반영되고, 나머지는 `NotPaused`가 됩니다.
///
/// 반환값은 이번에 확정된 일시정지 시간(초)입니다.
pub async fn resume_week(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<i64, AppError> {
    let (pause_start, total_pause_time) =
        sqlx::query_as::<_, (Option<DateTime<Utc>>, i64)>(
            r#"
            SELECT pause_start, total_pause_time
            FROM work_weeks
            WHERE user_id = ? AND week_end IS NULL AND status = 'paused'
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(TimerError::NotPaused)?;

    let paused_for = pause_duration(pause_start, now);

    let result = sqlx::query(
        r#"
        UPDATE work_weeks
        SET status = 'running', pause_start = NULL, last_update_time = ?, total_pause_time = ?
        WHERE user_id = ? AND week_end IS NULL AND status = 'paused'
        "#,
    )
    .bind(now)
    .bind(total_pause_time + paused_for)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(TimerError::NotPaused.into());
    }
    Ok(paused_for)
}

/// running 주간의 last_update_time만 갱신합니다 (현재 시간 조회 시 사용).
pub async fn touch_running(
    pool: &SqlitePool,
    id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE work_weeks
        SET last_update_time = ?
        WHERE id = ? AND status = 'running'
        "#,
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_work_week(pool: &SqlitePool, id: &str) -> Result<Option<WorkWeek>, AppError> {
    let week = sqlx::query_as::<_, WorkWeek>(&format!(
        "SELECT {WORK_WEEK_COLUMNS} FROM work_weeks WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(week)
}

/// 사용자의 활성 주간 (없으면 None)
pub async fn find_active(pool: &SqlitePool, user_id: &str) -> Result<Option<WorkWeek>, AppError> {
    let week = sqlx::query_as::<_, WorkWeek>(&format!(
        "SELECT {WORK_WEEK_COLUMNS} FROM work_weeks \
         WHERE user_id = ? AND week_end IS NULL \
         ORDER BY created_at DESC, id DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(week)
}

/// 사용자가 가장 최근에 만든 주간 (종료 여부와 무관)
pub async fn find_latest(pool: &SqlitePool, user_id: &str) -> Result<Option<WorkWeek>, AppError> {
    let week = sqlx::query_as::<_, WorkWeek>(&format!(
        "SELECT {WORK_WEEK_COLUMNS} FROM work_weeks \
         WHERE user_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(week)
}

/// 최근 주간 요약 목록 (week_start 내림차순, 최대 `limit`개)
pub async fn list_history(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<WorkWeekSummary>, AppError> {
    let weeks = sqlx::query_as::<_, WorkWeekSummary>(
        r#"
        SELECT id, week_start, week_end, status, total_pause_time, week_goal_minutes
        FROM work_weeks
        WHERE user_id = ?
        ORDER BY week_start DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};
    use crate::models::WorkWeekStatus;
    use crate::services::timer::elapsed_seconds;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
    }

    async fn setup(username: &str) -> (SqlitePool, String) {
        let pool = test_pool().await;
        let user_id = uuid::Uuid::now_v7().to_string();
        users::create_user(&pool, &user_id, username, "$argon2id$stub", t0())
            .await
            .unwrap();
        (pool, user_id)
    }

    #[tokio::test]
    async fn full_cycle_accumulates_pauses() {
        let (pool, user) = setup("dana").await;

        let started = start_week(&pool, &user, 600, t0()).await.unwrap();
        assert_eq!(started.status, WorkWeekStatus::Running);
        assert_eq!(started.week_goal_minutes, 600);
        assert_eq!(started.week_end, None);

        pause_week(&pool, &user, t0() + Duration::seconds(100)).await.unwrap();
        let first = resume_week(&pool, &user, t0() + Duration::seconds(160)).await.unwrap();
        pause_week(&pool, &user, t0() + Duration::seconds(1000)).await.unwrap();
        let second = resume_week(&pool, &user, t0() + Duration::seconds(1240)).await.unwrap();
        assert_eq!((first, second), (60, 240));

        let week = get_work_week(&pool, &started.id).await.unwrap().unwrap();
        assert_eq!(week.total_pause_time, 300);
        assert_eq!(week.pause_start, None);
        assert_eq!(week.last_update_time, t0() + Duration::seconds(1240));

        end_week(&pool, &user, t0() + Duration::seconds(3600)).await.unwrap();
        let week = get_work_week(&pool, &started.id).await.unwrap().unwrap();
        assert_eq!(week.status, WorkWeekStatus::Stopped);
        assert_eq!(week.week_end, Some(t0() + Duration::seconds(3600)));
        assert_eq!(week.last_update_time, t0() + Duration::seconds(3600));
        assert_eq!(elapsed_seconds(&week, t0() + Duration::days(2)), 3300);
    }

    #[tokio::test]
    async fn touch_refreshes_only_running_weeks() {
        let (pool, user) = setup("dora").await;
        let week = start_week(&pool, &user, 0, t0()).await.unwrap();

        touch_running(&pool, &week.id, t0() + Duration::seconds(90)).await.unwrap();
        let after = get_work_week(&pool, &week.id).await.unwrap().unwrap();
        assert_eq!(after.last_update_time, t0() + Duration::seconds(90));
        assert_eq!(after.status, WorkWeekStatus::Running);

        pause_week(&pool, &user, t0() + Duration::seconds(120)).await.unwrap();
        touch_running(&pool, &week.id, t0() + Duration::seconds(500)).await.unwrap();
        let after = get_work_week(&pool, &week.id).await.unwrap().unwrap();
        assert_eq!(after.last_update_time, t0() + Duration::seconds(120));
        assert_eq!(after.status, WorkWeekStatus::Paused);

        end_week(&pool, &user, t0() + Duration::seconds(600)).await.unwrap();
        touch_running(&pool, &week.id, t0() + Duration::seconds(900)).await.unwrap();
        let after = get_work_week(&pool, &week.id).await.unwrap().unwrap();
        assert_eq!(after.last_update_time, t0() + Duration::seconds(600));
    }

    #[tokio::test]
    async fn start_fails_while_any_week_is_active() {
        let (pool, user) = setup("erin").await;
        start_week(&pool, &user, 0, t0()).await.unwrap();

        let err = start_week(&pool, &user, 0, t0()).await.unwrap_err();
        assert!(matches!(err, AppError::Timer(TimerError::AlreadyActive)));

        // paused 상태여도 마찬가지
        pause_week(&pool, &user, t0() + Duration::seconds(5)).await.unwrap();
        let err = start_week(&pool, &user, 0, t0()).await.unwrap_err();
        assert!(matches!(err, AppError::Timer(TimerError::AlreadyActive)));

        // 종료 후에는 새로 시작 가능
        end_week(&pool, &user, t0() + Duration::seconds(10)).await.unwrap();
        start_week(&pool, &user, 0, t0() + Duration::seconds(20)).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_transitions_leave_row_untouched() {
        let (pool, user) = setup("frank").await;

        let err = pause_week(&pool, &user, t0()).await.unwrap_err();
        assert!(matches!(err, AppError::Timer(TimerError::NotRunning)));
        let err = end_week(&pool, &user, t0()).await.unwrap_err();
        assert!(matches!(err, AppError::Timer(TimerError::NoActiveWeek)));

        let week = start_week(&pool, &user, 0, t0()).await.unwrap();
        let err = resume_week(&pool, &user, t0() + Duration::seconds(30)).await.unwrap_err();
        assert!(matches!(err, AppError::Timer(TimerError::NotPaused)));

        pause_week(&pool, &user, t0() + Duration::seconds(40)).await.unwrap();
        let err = pause_week(&pool, &user, t0() + Duration::seconds(50)).await.unwrap_err();
        assert!(matches!(err, AppError::Timer(TimerError::NotRunning)));

        let after = get_work_week(&pool, &week.id).await.unwrap().unwrap();
        assert_eq!(after.status, WorkWeekStatus::Paused);
        assert_eq!(after.pause_start, Some(t0() + Duration::seconds(40)));
        assert_eq!(after.last_update_time, t0() + Duration::seconds(40));
        assert_eq!(after.total_pause_time, 0);
    }

    #[tokio::test]
    async fn resume_without_pause_start_adds_nothing() {
        let (pool, user) = setup("gail").await;
        let week = start_week(&pool, &user, 0, t0()).await.unwrap();

        sqlx::query("UPDATE work_weeks SET status = 'paused', pause_start = NULL WHERE id = ?")
            .bind(&week.id)
            .execute(&pool)
            .await
            .unwrap();

        let added = resume_week(&pool, &user, t0() + Duration::hours(1)).await.unwrap();
        assert_eq!(added, 0);

        let after = get_work_week(&pool, &week.id).await.unwrap().unwrap();
        assert_eq!(after.total_pause_time, 0);
        assert_eq!(after.status, WorkWeekStatus::Running);
    }

    #[tokio::test]
    async fn end_discards_open_pause() {
        let (pool, user) = setup("hank").await;
        let week = start_week(&pool, &user, 0, t0()).await.unwrap();
        pause_week(&pool, &user, t0() + Duration::seconds(100)).await.unwrap();
        end_week(&pool, &user, t0() + Duration::seconds(400)).await.unwrap();

        let after = get_work_week(&pool, &week.id).await.unwrap().unwrap();
        assert_eq!(after.status, WorkWeekStatus::Stopped);
        assert_eq!(after.total_pause_time, 0);
        assert!(find_active(&pool, &user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_is_newest_first_and_capped() {
        let (pool, user) = setup("iris").await;

        for i in 0..(HISTORY_LIMIT + 5) {
            let at = t0() + Duration::hours(i);
            start_week(&pool, &user, 0, at).await.unwrap();
            end_week(&pool, &user, at + Duration::minutes(30)).await.unwrap();
        }

        let history = list_history(&pool, &user, HISTORY_LIMIT).await.unwrap();
        assert_eq!(history.len() as i64, HISTORY_LIMIT);
        assert_eq!(history[0].week_start, t0() + Duration::hours(HISTORY_LIMIT + 4));
        assert!(history
            .windows(2)
            .all(|pair| pair[0].week_start > pair[1].week_start));
    }

    #[tokio::test]
    async fn latest_and_active_are_scoped_per_user() {
        let (pool, first) = setup("jack").await;
        let second = uuid::Uuid::now_v7().to_string();
        users::create_user(&pool, &second, "kate", "$argon2id$stub", t0())
            .await
            .unwrap();

        start_week(&pool, &first, 0, t0()).await.unwrap();
        assert!(find_active(&pool, &second).await.unwrap().is_none());
        assert!(find_latest(&pool, &second).await.unwrap().is_none());

        // 다른 사용자는 독립적으로 시작할 수 있음
        start_week(&pool, &second, 0, t0()).await.unwrap();
        end_week(&pool, &first, t0() + Duration::minutes(1)).await.unwrap();

        let latest = find_latest(&pool, &first).await.unwrap().unwrap();
        assert_eq!(latest.status, WorkWeekStatus::Stopped);
        assert!(find_active(&pool, &second).await.unwrap().is_some());
    }
}
