//! # 타이머 상태 머신 서비스
//!
//! 작업 주간의 상태 전이 에러와 경과 시간 계산을 담당하는 **순수 함수** 모음입니다.
//! DB나 시계에 직접 접근하지 않고, "현재 시각"(`now`)을 인자로 받습니다.
//! 그래서 테스트에서 시각을 자유롭게 고정할 수 있습니다.
//!
//! ## 경과 시간 규칙 (`elapsed_seconds`)
//! | 상태 | 계산식 |
//! |------|--------|
//! | stopped (week_end 있음) | (week_end − week_start) − total_pause_time |
//! | running | (now − week_start) − total_pause_time |
//! | paused | (last_update_time − week_start) − total_pause_time − (now − pause_start) |
//! | 그 외 | (last_update_time − week_start) − total_pause_time |
//!
//! 결과를 0으로 자르지(clamp) 않습니다. 시계가 어긋나거나 데이터가 손상되면
//! 음수가 나올 수 있으며, 이는 허용된 동작입니다.

use crate::models::{
    WorkWeek, WorkWeekHistoryItem, WorkWeekStatus, WorkWeekSummary, DEFAULT_GOAL_MINUTES,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 상태 전이 조건을 만족하지 못했을 때의 에러
///
/// 모두 "현재 상태에서는 이 동작을 할 수 없다"는 의미이며,
/// 에러가 나면 DB는 전혀 변경되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("Week already started")]
    AlreadyActive,
    #[error("No active week found")]
    NoActiveWeek,
    #[error("No running timer found")]
    NotRunning,
    #[error("No paused timer found")]
    NotPaused,
}

impl TimerError {
    /// 에러 응답 JSON의 `code` 값
    pub fn code(&self) -> &'static str {
        match self {
            TimerError::AlreadyActive => "already_active",
            TimerError::NoActiveWeek => "no_active_week",
            TimerError::NotRunning => "not_running",
            TimerError::NotPaused => "not_paused",
        }
    }
}

/// 요청된 목표 시간이 양수가 아니면 기본값(2400분)으로 대체합니다.
pub fn effective_goal_minutes(requested: i64) -> i64 {
    if requested > 0 {
        requested
    } else {
        DEFAULT_GOAL_MINUTES
    }
}

/// `to − from`을 초 단위 정수로 (0 방향으로 버림)
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds()
}

/// 재개 시점에 확정할 일시정지 시간(초). 일시정지 시작 기록이 없으면 0입니다.
pub fn pause_duration(pause_start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    pause_start.map_or(0, |started| seconds_between(started, now))
}

/// 작업 주간의 경과 작업 시간(초)을 계산합니다.
pub fn elapsed_seconds(week: &WorkWeek, now: DateTime<Utc>) -> i64 {
    if let (WorkWeekStatus::Stopped, Some(week_end)) = (week.status, week.week_end) {
        return seconds_between(week.week_start, week_end) - week.total_pause_time;
    }

    let (current, live_pause) = match week.status {
        WorkWeekStatus::Running => (now, 0),
        // 진행 중인 일시정지는 아직 total_pause_time에 확정되지 않았으므로 여기서 따로 뺍니다.
        WorkWeekStatus::Paused => (week.last_update_time, pause_duration(week.pause_start, now)),
        WorkWeekStatus::Stopped => (week.last_update_time, 0),
    };

    seconds_between(week.week_start, current) - week.total_pause_time - live_pause
}

/// 이력 목록용 작업 시간(분)
///
/// 요약 행에는 `pause_start`가 없으므로, paused 주간은 `week_start`를 현재 시각으로
/// 간주합니다. 그 결과 paused 주간은 (−total_pause_time / 60)분, 대개 0분으로 표시됩니다.
/// 단건 조회(`elapsed_seconds`)와 값이 다르지만 기존 API 동작을 그대로 유지합니다.
pub fn history_work_minutes(week: &WorkWeekSummary, now: DateTime<Utc>) -> i64 {
    let current = match (week.week_end, week.status) {
        (Some(week_end), _) => week_end,
        (None, WorkWeekStatus::Running) => now,
        (None, WorkWeekStatus::Paused) => week.week_start,
        // 종료 시각 없이 stopped인 행은 계산하지 않습니다.
        (None, WorkWeekStatus::Stopped) => return 0,
    };

    (seconds_between(week.week_start, current) - week.total_pause_time) / 60
}

/// 최신순으로 정렬된 요약 행들에 번호와 작업 시간을 붙여 이력 응답을 만듭니다.
pub fn build_history(weeks: Vec<WorkWeekSummary>, now: DateTime<Utc>) -> Vec<WorkWeekHistoryItem> {
    weeks
        .into_iter()
        .enumerate()
        .map(|(index, week)| WorkWeekHistoryItem {
            total_work_minutes: history_work_minutes(&week, now),
            week_number: index + 1,
            is_paused: week.status == WorkWeekStatus::Paused,
            id: week.id,
            started_at: week.week_start,
            ended_at: week.week_end,
            week_goal_minutes: week.week_goal_minutes,
            status: week.status,
        })
        .collect()
}
