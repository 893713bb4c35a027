//! Serves the article index over HTTP. The only route is
//! [`ARTICLES_ROUTE`], which rebuilds the index on every request.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use crate::article::ArticleEntry;
use crate::index::{self, Indexer};

/// The route the article index is served from.
pub const ARTICLES_ROUTE: &str = "/api/articles.json";

/// Builds the router for the site's API.
pub fn router(indexer: Arc<Indexer>) -> Router {
    Router::new()
        .route(ARTICLES_ROUTE, get(articles))
        .with_state(indexer)
}

/// Serves [`router`] on `listener` until Ctrl-C is received.
pub async fn serve(listener: TcpListener, indexer: Arc<Indexer>) -> std::io::Result<()> {
    tracing::info!(
        address = %listener.local_addr()?,
        directory = %indexer.articles_directory().display(),
        "serving {}",
        ARTICLES_ROUTE
    );
    axum::serve(listener, router(indexer))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for Ctrl-C");
        // without a signal handler, keep serving rather than exiting at once
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn articles(
    State(indexer): State<Arc<Indexer>>,
) -> Result<Json<Vec<ArticleEntry>>, ApiError> {
    Ok(Json(indexer.build_index().await?))
}

/// Turns a failed index build into a `500` with a JSON body. The build is all
/// or nothing, so there is never a partial list to send instead.
struct ApiError(index::Error);

impl From<index::Error> for ApiError {
    fn from(err: index::Error) -> ApiError {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(err = %self.0, "building article index");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::article::ArticleMetadata;
    use crate::config::Config;
    use crate::testing::{article, write_file};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    async fn fetch(
        router: Router,
        uri: &str,
    ) -> std::result::Result<(StatusCode, Vec<u8>), Box<dyn std::error::Error>> {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    fn app(dir: &std::path::Path) -> Router {
        router(Arc::new(Indexer::new(&Config::new(dir))))
    }

    #[tokio::test]
    async fn test_articles_endpoint() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_file(dir.path(), "a.md", &article("A", "2023-01-01", &[]))?;
        write_file(dir.path(), "b.md", &article("B", "2023-06-15", &["news"]))?;

        let (status, body) = fetch(app(dir.path()), ARTICLES_ROUTE).await?;
        assert_eq!(StatusCode::OK, status);

        let entries: Vec<ArticleEntry> = serde_json::from_slice(&body)?;
        assert_eq!(
            vec![
                ArticleEntry {
                    meta: ArticleMetadata {
                        title: String::from("B"),
                        date: String::from("2023-06-15"),
                        tags: vec![String::from("news")],
                    },
                    path: String::from("b"),
                },
                ArticleEntry {
                    meta: ArticleMetadata {
                        title: String::from("A"),
                        date: String::from("2023-01-01"),
                        tags: vec![],
                    },
                    path: String::from("a"),
                },
            ],
            entries
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_articles_endpoint_reflects_changes() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_file(dir.path(), "a.md", &article("A", "2023-01-01", &[]))?;
        let app = app(dir.path());

        let (_, body) = fetch(app.clone(), ARTICLES_ROUTE).await?;
        assert_eq!(1, serde_json::from_slice::<Vec<ArticleEntry>>(&body)?.len());

        write_file(dir.path(), "b.md", &article("B", "2023-06-15", &[]))?;
        let (_, body) = fetch(app, ARTICLES_ROUTE).await?;
        assert_eq!(2, serde_json::from_slice::<Vec<ArticleEntry>>(&body)?.len());
        Ok(())
    }

    #[tokio::test]
    async fn test_articles_endpoint_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_file(dir.path(), "a.md", &article("A", "2023-01-01", &[]))?;
        write_file(dir.path(), "bad.md", &article("Bad", "someday", &[]))?;

        let (status, body) = fetch(app(dir.path()), ARTICLES_ROUTE).await?;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);

        let body: serde_json::Value = serde_json::from_slice(&body)?;
        let message = body["error"].as_str().unwrap_or_default();
        assert!(message.contains("bad.md"), "message: {}", message);
        assert!(message.contains("someday"), "message: {}", message);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_route() -> TestResult {
        let dir = tempfile::tempdir()?;
        let (status, _) = fetch(app(dir.path()), "/api/other.json").await?;
        assert_eq!(StatusCode::NOT_FOUND, status);
        Ok(())
    }
}
