//! # words-api 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성과 마이그레이션
//! 4. `import <dir>` 인자가 있으면 Wordset 사전을 가져오고 종료
//! 5. 외부 사전 클라이언트, 단어 조회기, 세션 저장소(+ 정리 작업) 생성
//! 6. API 라우터와 CORS/로깅 미들웨어 설정
//! 7. HTTP 서버 시작, Ctrl+C로 정상 종료

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use config::Config;
use routes::AppState;
use services::dictionary::HttpDictionary;
use services::importer;
use services::resolver::WordResolver;
use services::session_store::SessionStore;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 words_api, tower_http, axum을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "words_api=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // ── 3단계: SQLite 연결 풀 + 마이그레이션 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 4단계: 일괄 가져오기 모드 ──
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [command, dir] = args.as_slice() {
        if command == "import" {
            return run_import(&pool, Path::new(dir)).await;
        }
    }
    if args.first().is_some_and(|a| a == "import") {
        anyhow::bail!("Usage: words-api import <wordset-data-dir>");
    }

    tracing::info!("Starting words-api server on {}:{}", config.host, config.port);

    // ── 5단계: 공유 상태 ──
    let dictionary = HttpDictionary::new(&config.dictionary_api_url, config.dictionary_timeout)
        .context("Failed to set up dictionary client")?;
    let resolver = Arc::new(WordResolver::new(pool.clone(), Arc::new(dictionary)));

    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    let sweeper = sessions.spawn_sweeper(config.session_sweep_interval);

    let state = AppState {
        pool: pool.clone(),
        sessions,
        resolver,
        session_ttl_secs: config.session_ttl.num_seconds(),
        cookie_secure: config.cookie_secure,
    };

    // ── 6단계: CORS ──
    // 세션 쿠키를 주고받아야 하므로 출처를 명시하고 credentials를 허용합니다.
    // (allow_credentials와 와일드카드 출처는 함께 쓸 수 없습니다)
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true);

    let app = Router::new()
        .nest("/api", routes::api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 7단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.stop().await;
    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // 신호를 받을 수 없으면 종료 트리거 없이 계속 실행
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn run_import(pool: &sqlx::SqlitePool, dir: &Path) -> Result<()> {
    tracing::info!("Starting dictionary import from {}", dir.display());
    let started = std::time::Instant::now();

    let index = importer::load_wordset_dir(dir)
        .await
        .with_context(|| format!("Failed to read {}", dir.display()))?;
    let report = importer::import_words(pool, index.into_words()).await?;

    tracing::info!(
        imported = report.imported,
        skipped = report.skipped,
        failed = report.failed,
        "Import complete in {:.1}s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
