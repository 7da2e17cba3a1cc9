//! # 헬스체크 핸들러
//!
//! - `GET /api/health` → `{ "status": "ok" }`
//!
//! 로드밸런서나 컨테이너 헬스체크가 서버 가동 여부를 확인하는 용도입니다.
//! DB나 외부 사전은 확인하지 않습니다.

use axum::Json;                // JSON 응답 래퍼
use serde_json::{json, Value}; // JSON 생성 유틸리티

/// `GET /health` — 서버 상태를 확인합니다.
///
/// State나 Path 같은 추출기 없이 고정된 JSON만 반환하므로 실패하지 않습니다.
/// `Json<Value>`를 반환하면 Axum이 Content-Type과 200 OK를 설정합니다.
pub async fn health_check() -> Json<Value> {
    // 결과: {"status": "ok"}
    Json(json!({
        "status": "ok"
    }))
}
