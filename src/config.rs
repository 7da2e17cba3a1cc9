//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져오며, 모든 항목에 기본값이 있습니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로
//! - `HOST` / `PORT`: 서버 바인딩 주소와 포트
//! - `DICTIONARY_API_URL`: 외부 사전 API 기본 주소
//! - `DICTIONARY_TIMEOUT_SECS`: 외부 사전 API 요청 제한 시간
//! - `SESSION_TTL_HOURS`: 세션 유효 시간
//! - `SESSION_SWEEP_INTERVAL_SECS`: 만료 세션 정리 주기
//! - `CORS_ORIGINS`: 허용할 프론트엔드 출처 (쉼표 구분)
//! - `COOKIE_SECURE`: 세션 쿠키에 `Secure` 속성 부여 여부

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:words.db?mode=rwc")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 9090)
    pub port: u16,
    /// 외부 사전 API 주소. 요청 시 뒤에 `/{word}`가 붙습니다.
    pub dictionary_api_url: String,
    /// 외부 사전 API 요청 제한 시간
    pub dictionary_timeout: Duration,
    /// 세션 수명 (고정 만료, 갱신 없음)
    pub session_ttl: chrono::Duration,
    /// 만료 세션 정리 주기
    pub session_sweep_interval: Duration,
    /// CORS 허용 출처 목록
    pub cors_origins: Vec<String>,
    /// 세션 쿠키 `Secure` 속성 (HTTPS 운영 환경에서 true)
    pub cookie_secure: bool,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 값이 없거나 파싱에 실패하면 기본값을 사용하므로 실패하지 않습니다.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:words.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 9090),
            dictionary_api_url: env::var("DICTIONARY_API_URL").unwrap_or_else(|_| {
                "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
            }),
            dictionary_timeout: Duration::from_secs(parse_or("DICTIONARY_TIMEOUT_SECS", 10)),
            session_ttl: chrono::Duration::hours(parse_or("SESSION_TTL_HOURS", 24)),
            session_sweep_interval: Duration::from_secs(parse_or(
                "SESSION_SWEEP_INTERVAL_SECS",
                3600,
            )),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            cookie_secure: parse_or("COOKIE_SECURE", false),
        }
    }
}

/// 환경변수를 원하는 타입으로 파싱하고, 없거나 잘못된 값이면 기본값을 반환합니다.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
