use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;

use super::{ApiError, AppState, no_content, ok_json};
use crate::model::ProductPanelAssociation;
use crate::service::AddProductsResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/panels/{id}/products",
            get(list_panel_products).post(add_products),
        )
        .route(
            "/panels/{id}/products/{product_id}",
            put(update_placement).delete(remove_product),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddProductsBody {
    product_ids: Vec<String>,
}

async fn list_panel_products(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductPanelAssociation>>, ApiError> {
    ok_json(svc.list_panel_associations(&id))
}

async fn add_products(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AddProductsBody>,
) -> Result<Json<AddProductsResult>, ApiError> {
    ok_json(svc.add_products_to_panel(&id, &body.product_ids))
}

async fn update_placement(
    State(svc): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<ProductPanelAssociation>, ApiError> {
    ok_json(svc.update_association(&id, &product_id, patch))
}

async fn remove_product(
    State(svc): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    no_content(svc.remove_product_from_panel(&id, &product_id))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::testutil::{app, send};
    use crate::service::testutil::{department, panel, product};

    #[tokio::test]
    async fn add_place_and_remove() {
        let (app, svc) = app();
        let dep = department(&svc, "Açougue");
        let tv = panel(&svc, &dep.id, "TV 1");
        let a = product(&svc, "Picanha", None);
        let base = format!("/panel/v1/panels/{}/products", tv.id);

        let (status, added) = send(
            &app,
            "POST",
            &base,
            Some(json!({"productIds": [a.id, "ghost"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(added["addedCount"], 1);

        let (status, placed) = send(
            &app,
            "PUT",
            &format!("{base}/{}", a.id),
            Some(json!({"position": 7})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(placed["position"], 7);
        assert_eq!(placed["activeInPanel"], true);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("{base}/{}", a.id),
            Some(json!({"position": 30})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "position must be between 1 and 24");

        let (_, list) = send(&app, "GET", &base, None).await;
        assert_eq!(list[0]["position"], 7);

        let (status, _) = send(&app, "DELETE", &format!("{base}/{}", a.id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &format!("{base}/{}", a.id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
