//! # 작업 주간(WorkWeek) 모델 정의
//!
//! 사용자가 시작/일시정지/재개/종료하는 작업 세션 하나를 "작업 주간"이라고 부릅니다.
//!
//! ## 상태 흐름
//! ```text
//! start ──▶ running ──pause──▶ paused
//!              ▲                  │
//!              └──────resume──────┘
//! running / paused ──end──▶ stopped
//! ```
//!
//! 경과 시간 계산은 `services::timer`가 담당하고, 이 모듈은 데이터 모양만 정의합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 목표 시간을 지정하지 않았을 때의 기본값 (40시간)
pub const DEFAULT_GOAL_MINUTES: i64 = 2400;

/// 작업 주간의 상태
///
/// DB에는 소문자 TEXT("running", "paused", "stopped")로 저장됩니다.
/// `#[sqlx(rename_all = "lowercase")]`가 enum ↔ 문자열 변환을 자동으로 만들어 줍니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum WorkWeekStatus {
    Running,
    Paused,
    Stopped,
}

/// 작업 주간 엔티티 — DB의 `work_weeks` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WorkWeek {
    /// 고유 식별자 (UUIDv7)
    pub id: String,
    /// 소유자 (users.id)
    pub user_id: String,
    /// 시작 시각. 생성 후 변경되지 않습니다.
    pub week_start: DateTime<Utc>,
    /// 종료 시각 — None이면 아직 진행 중(running 또는 paused)인 주간
    pub week_end: Option<DateTime<Utc>>,
    /// 마지막 상태 변경 시각. 일시정지/비정상 상태에서 "현재 시각" 대용으로 쓰입니다.
    pub last_update_time: DateTime<Utc>,
    pub status: WorkWeekStatus,
    /// 진행 중인 일시정지의 시작 시각 (paused 상태에서만 Some)
    pub pause_start: Option<DateTime<Utc>>,
    /// 확정된 일시정지 시간의 합계 (초). 재개할 때만 증가합니다.
    pub total_pause_time: i64,
    /// 목표 작업 시간 (분). 표시용이며 강제하지 않습니다.
    pub week_goal_minutes: i64,
}

/// 이력 조회용 요약 행 — `pause_start`, `last_update_time`은 조회하지 않습니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkWeekSummary {
    pub id: String,
    pub week_start: DateTime<Utc>,
    pub week_end: Option<DateTime<Utc>>,
    pub status: WorkWeekStatus,
    pub total_pause_time: i64,
    pub week_goal_minutes: i64,
}

/// `POST /api/workweek/start` 요청 본문
///
/// `goal_minutes`가 없거나 `null`이거나 0 이하이면 기본값(2400분)을 사용합니다.
/// 프론트엔드는 숫자가 아닌 입력을 `null`로 보냅니다.
#[derive(Debug, Default, Deserialize)]
pub struct StartWeekRequest {
    #[serde(default)]
    pub goal_minutes: Option<i64>,
}

/// `GET /api/workweek` 응답의 `work_week` 필드
///
/// `#[serde(flatten)]`: WorkWeek의 필드들을 중첩 없이 같은 JSON 객체에 펼칩니다.
/// 결과: `{ "id": ..., "status": "running", ..., "elapsed_time": 3600 }`
#[derive(Debug, Serialize)]
pub struct WorkWeekResponse {
    #[serde(flatten)]
    pub work_week: WorkWeek,
    /// 경과 작업 시간 (초)
    pub elapsed_time: i64,
}

/// `GET /api/workweek/history` 응답 배열의 원소
#[derive(Debug, Clone, Serialize)]
pub struct WorkWeekHistoryItem {
    pub id: String,
    /// 응답 순서 기준 1부터 시작하는 번호 (가장 최근 = 1). DB에 저장되지 않습니다.
    pub week_number: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_work_minutes: i64,
    pub week_goal_minutes: i64,
    pub is_paused: bool,
    pub status: WorkWeekStatus,
}

/// `GET /api/workweek/current-time` 응답
#[derive(Debug, Serialize)]
pub struct CurrentTimeResponse {
    pub elapsed_time: i64,
    pub status: WorkWeekStatus,
    pub week_start: Option<DateTime<Utc>>,
    pub week_end: Option<DateTime<Utc>>,
}

impl CurrentTimeResponse {
    /// 활성 주간이 없을 때의 응답
    pub fn idle() -> Self {
        Self {
            elapsed_time: 0,
            status: WorkWeekStatus::Stopped,
            week_start: None,
            week_end: None,
        }
    }
}
