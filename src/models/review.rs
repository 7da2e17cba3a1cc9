//! # 복습 이력 모델
//!
//! 복습 이력은 추가만 가능한(append-only) 로그입니다.
//! 수정/삭제되지 않으므로 연속 학습일(streak) 계산의 근거가 됩니다.

use serde::{Deserialize, Serialize};

/// 복습 한 번의 기록 — `review_history` 행 + 표제어(JOIN)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewHistory {
    pub id: String,
    pub user_id: String,
    pub word_id: String,
    pub word: String,
    /// 기억 품질 점수 (0~5)
    pub quality: i64,
    /// 이 복습 결과로 정해진 간격
    pub interval_days: i64,
    /// 이 복습 결과로 정해진 난이도 계수
    pub ease_factor: f64,
    pub reviewed_at: String,
}

/// 복습 제출 요청 — `POST /api/review/:word`
///
/// 범위 검사(0~5)는 스케줄러가 수행하므로 여기서는 정수로만 받습니다.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub quality: i64,
}
