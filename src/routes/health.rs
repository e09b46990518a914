//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/health` → `{ "status": "ok" }`
//!
//! 인증이 필요 없으며, 컨테이너 오케스트레이터나 리버스 프록시가 서버 가동 여부를
//! 확인하는 용도입니다. DB 상태는 확인하지 않습니다.

use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{call, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn health_is_public() {
        let (app, _) = test_app().await;
        let (status, body) = call(&app, "GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
