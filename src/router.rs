//! Server router definition.
//!
//! The following routes are supported:
//!
//! - GET: `/`
//! - POST: `/interactions`

use crate::discord::{api::DiscordApi, auth::PublicKey, router::discord_router};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

/// What the liveness route answers with.
pub const ALIVE: &str = "Bot TopIdiom en ligne 🟢";

/// Dependencies shared by routes across requests.
#[derive(Clone)]
pub struct Deps {
    /// Absent when Discord isn't configured, in which case only the liveness
    /// route is of any use.
    pub discord: Option<DiscordDeps>,
}

#[derive(Clone)]
pub struct DiscordDeps {
    pub api: Arc<dyn DiscordApi>,
    pub public_key: PublicKey,
}

/// Instantiate a new router with tracing.
pub fn new(deps: Deps) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
        .on_response(trace::DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .nest("/interactions", discord_router())
        .layer(trace_layer)
        // Exclude the liveness route from tracing; the host polls it.
        .route("/", get(|| async { ALIVE }))
        .with_state(deps)
}

#[cfg(test)]
mod tests_general {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn router() -> Router {
        super::new(Deps { discord: None })
    }

    async fn plaintext_body(body: Body) -> String {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found() {
        let req = Request::builder()
            .uri("/bad/route")
            .body(Body::empty())
            .unwrap();

        let res = router().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_alive() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();

        let res = router().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(plaintext_body(res.into_body()).await, ALIVE);
    }

    #[tokio::test]
    async fn test_alive_bad_method() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let res = router().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
