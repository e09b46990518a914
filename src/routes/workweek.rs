//! # 작업 주간 API 라우트 핸들러
//!
//! ## 엔드포인트 목록 (모두 `Authorization: Bearer <token>` 필요)
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/workweek | `get_work_week` | 가장 최근 주간 + 경과 시간 |
//! | GET | /api/workweek/history | `get_history` | 최근 50개 주간 요약 |
//! | POST | /api/workweek/start | `start_week` | 새 주간 시작 |
//! | POST | /api/workweek/end | `end_week` | 활성 주간 종료 |
//! | POST | /api/workweek/pause | `pause_week` | 일시정지 |
//! | POST | /api/workweek/resume | `resume_week` | 재개 |
//! | GET | /api/workweek/current-time | `current_time` | 활성 주간의 경과 시간 |
//!
//! ## 사용 흐름
//! ```text
//! 1. POST /workweek/start { "goal_minutes": 2400 }
//! 2. GET  /workweek/current-time  (주기적으로 폴링)
//! 3. POST /workweek/pause → POST /workweek/resume (반복 가능)
//! 4. POST /workweek/end
//! 5. GET  /workweek/history
//! ```
//!
//! "현재 시각"은 각 핸들러가 `Utc::now()`로 한 번만 읽어 DB 함수와 계산에 함께 넘깁니다.

use crate::{
    db::work_weeks as db_weeks,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::timer,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// `GET /api/workweek` → `{ "work_week": WorkWeekResponse | null }`
///
/// 종료 여부와 관계없이 가장 최근에 만든 주간을 돌려줍니다.
pub async fn get_work_week(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let now = Utc::now();
    let response = db_weeks::find_latest(&state.pool, &auth_user.user_id)
        .await?
        .map(|work_week| WorkWeekResponse {
            elapsed_time: timer::elapsed_seconds(&work_week, now),
            work_week,
        });

    Ok(Json(json!({ "work_week": response })))
}

/// `GET /api/workweek/history` → `[WorkWeekHistoryItem]`
pub async fn get_history(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<WorkWeekHistoryItem>>, AppError> {
    let weeks =
        db_weeks::list_history(&state.pool, &auth_user.user_id, db_weeks::HISTORY_LIMIT).await?;
    Ok(Json(timer::build_history(weeks, Utc::now())))
}

/// `POST /api/workweek/start` + `{ "goal_minutes": 2400 }`
///
/// 본문을 해석할 수 없으면 `AppError::JsonRejection`(400)으로 응답합니다.
pub async fn start_week(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<StartWeekRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let goal_minutes = timer::effective_goal_minutes(req.goal_minutes.unwrap_or(0));
    let week =
        db_weeks::start_week(&state.pool, &auth_user.user_id, goal_minutes, Utc::now()).await?;

    tracing::info!(
        user_id = %auth_user.user_id,
        work_week_id = %week.id,
        goal_minutes,
        "week started"
    );

    Ok(Json(json!({ "message": "Week started", "work_week_id": week.id })))
}

/// `POST /api/workweek/end`
pub async fn end_week(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_weeks::end_week(&state.pool, &auth_user.user_id, Utc::now()).await?;
    tracing::info!(user_id = %auth_user.user_id, "week ended");
    Ok(Json(json!({ "message": "Week ended" })))
}

/// `POST /api/workweek/pause`
pub async fn pause_week(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_weeks::pause_week(&state.pool, &auth_user.user_id, Utc::now()).await?;
    tracing::info!(user_id = %auth_user.user_id, "timer paused");
    Ok(Json(json!({ "message": "Timer paused" })))
}

/// `POST /api/workweek/resume`
pub async fn resume_week(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let paused_for = db_weeks::resume_week(&state.pool, &auth_user.user_id, Utc::now()).await?;
    tracing::info!(user_id = %auth_user.user_id, paused_for, "timer resumed");
    Ok(Json(json!({ "message": "Timer resumed" })))
}

/// `GET /api/workweek/current-time` → `{ elapsed_time, status, week_start, week_end }`
///
/// 활성 주간이 없으면 `{ "elapsed_time": 0, "status": "stopped", ... null }`.
/// running 주간이면 먼저 last_update_time을 갱신합니다. 갱신에 실패해도
/// 응답은 그대로 보내고 경고 로그만 남깁니다.
pub async fn current_time(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<CurrentTimeResponse>, AppError> {
    let Some(mut week) = db_weeks::find_active(&state.pool, &auth_user.user_id).await? else {
        return Ok(Json(CurrentTimeResponse::idle()));
    };

    let now = Utc::now();
    if week.status == WorkWeekStatus::Running {
        match db_weeks::touch_running(&state.pool, &week.id, now).await {
            Ok(()) => week.last_update_time = now,
            Err(e) => tracing::warn!(
                work_week_id = %week.id,
                error = %e,
                "failed to refresh last_update_time"
            ),
        }
    }

    Ok(Json(CurrentTimeResponse {
        elapsed_time: timer::elapsed_seconds(&week, now),
        status: week.status,
        week_start: Some(week.week_start),
        week_end: week.week_end,
    }))
}
