//! Demo page generation and the static server hosting it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;

/// Directory the generated page lands in, relative to the project root.
pub const DEMO_DIR: &str = "demo_interface";

/// Demo chat page, compiled into the binary.
static DEMO_PAGE: &str = include_str!("../assets/demo_page.html");

/// Write the demo page to `<root>/demo_interface/index.html`.
///
/// The page is a generated artifact and is rewritten on every run.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_demo_page(root: &Path) -> Result<PathBuf> {
    let dir = root.join(DEMO_DIR);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("index.html");
    std::fs::write(&path, DEMO_PAGE).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Build the static router serving the generated page.
///
/// Only `/` and `/index.html` resolve; the demo directory holds nothing
/// else worth serving.
#[must_use]
pub fn router(page: PathBuf) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .fallback(not_found)
        .with_state(page)
}

async fn index(State(page): State<PathBuf>) -> Result<Html<String>, StatusCode> {
    match tokio::fs::read_to_string(&page).await {
        Ok(content) => Ok(Html(content)),
        Err(e) => {
            tracing::warn!(path = %page.display(), error = %e, "demo page unreadable");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn test_write_demo_page_creates_index_html() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_demo_page(dir.path()).expect("write page");
        assert_eq!(path, dir.path().join(DEMO_DIR).join("index.html"));

        let content = std::fs::read_to_string(&path).expect("read page");
        assert!(content.contains("سُنا"), "page should carry the Arabic project name");
        assert!(content.contains("/api/v1/chat"), "page should call the mock chat API");
    }

    #[test]
    fn test_write_demo_page_overwrites_existing_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_demo_page(dir.path()).expect("first write");
        std::fs::write(&path, "stale").expect("clobber");

        write_demo_page(dir.path()).expect("second write");
        let content = std::fs::read_to_string(&path).expect("read page");
        assert!(content.contains("سُنا"));
    }

    #[tokio::test]
    async fn test_router_serves_page_at_root_and_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = write_demo_page(dir.path()).expect("write page");

        for uri in ["/", "/index.html"] {
            let response = router(page.clone())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK, "uri {uri}");

            let bytes = response.into_body().collect().await.expect("body").to_bytes();
            assert!(String::from_utf8_lossy(&bytes).contains("سُنا"));
        }
    }

    #[tokio::test]
    async fn test_router_404_for_other_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = write_demo_page(dir.path()).expect("write page");

        let response = router(page)
            .oneshot(
                Request::builder()
                    .uri("/anything-else")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_404_when_page_missing_on_disk() {
        let response = router(PathBuf::from("/nonexistent/index.html"))
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
