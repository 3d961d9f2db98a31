//! Module routes plus system endpoints.

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

/// Module routers already carry their own `/<module>/v1` prefix.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for (_name, router) in module_routes {
        app = app.merge(router);
    }
    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "tvpaneld",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use panel::PanelModule;
    use panel::service::PanelService;
    use tower::ServiceExt;
    use tvpanel_core::Module;
    use tvpanel_kv::RedbStore;

    use super::*;

    fn app() -> Router {
        let kv = Arc::new(RedbStore::open_in_memory().unwrap());
        let module = PanelModule::new(PanelService::new(kv));
        build_router(vec![(module.name(), module.routes())])
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn system_endpoints() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (_, body) = get_json(app(), "/version").await;
        assert_eq!(body["name"], "tvpaneld");
    }

    #[tokio::test]
    async fn panel_module_is_mounted() {
        let (status, body) = get_json(app(), "/panel/v1/departments").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);

        let (status, _) = get_json(app(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
