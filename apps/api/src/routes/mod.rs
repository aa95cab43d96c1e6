pub mod health;
pub mod owner;

use axum::{
    routing::{get, post},
    Router,
};

use crate::content::handlers as content;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route(
            "/api/v1/content/generate",
            post(generation::handle_generate),
        )
        .route("/api/v1/durations", get(generation::handle_list_durations))
        .route(
            "/api/v1/durations/by-category",
            get(generation::handle_durations_by_category),
        )
        .route("/api/v1/personas", get(generation::handle_list_personas))
        // Stored content
        .route("/api/v1/content", get(content::handle_list_content))
        .route("/api/v1/content/count", get(content::handle_count_content))
        .route(
            "/api/v1/content/:id",
            get(content::handle_get_content).delete(content::handle_delete_content),
        )
        .route(
            "/api/v1/content/:id/download",
            get(content::handle_download_content),
        )
        .route(
            "/api/v1/content/:id/short-version",
            post(content::handle_short_version),
        )
        .route(
            "/api/v1/content/:id/description",
            post(content::handle_enhance_description),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::content::lifecycle::testing::record;
    use crate::content::store::testing::MemoryContentStore;
    use crate::generation::invoker::testing::ScriptedGenerator;
    use crate::routes::owner::OWNER_HEADER;
    use crate::state::testing::state_with;

    const REPLY: &str = "### TÍTULO DO VÍDEO\nTítulo gerado\n### ROTEIRO\nTexto do roteiro.";

    fn app(store: Arc<MemoryContentStore>) -> Router {
        build_router(state_with(
            Arc::new(ScriptedGenerator::new(REPLY)),
            store,
            None,
        ))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_as(uri: &str, owner: Uuid) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(OWNER_HEADER, owner.to_string())
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_owner_is_unauthorized() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/api/v1/content").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_generate_returns_saved_bundle() {
        let store = Arc::new(MemoryContentStore::default());
        let body = json!({
            "persona": "GENERIC",
            "content_types": ["TITLE", "SCRIPT"],
            "theme": "Disciplina",
            "duration": 300
        });
        let response = app(store.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/content/generate")
                    .header(OWNER_HEADER, Uuid::new_v4().to_string())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "COMPLETED");
        assert_eq!(json["title"], "Título gerado");
        assert_eq!(json["saved"], true);
        assert_eq!(store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_content_types() {
        let body = json!({ "persona": "GENERIC", "content_types": [], "theme": "x" });
        let response = app(Arc::default())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/content/generate")
                    .header(OWNER_HEADER, Uuid::new_v4().to_string())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_foreign_content_is_not_found() {
        let store = Arc::new(MemoryContentStore::default());
        let rec = record(Uuid::new_v4(), "Privado", Duration::hours(1));
        store.records.lock().unwrap().push(rec.clone());

        let uri = format!("/api/v1/content/{}", rec.content_id);
        let response = app(store.clone())
            .oneshot(get_as(&uri, Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app(store)
            .oneshot(get_as(&uri, rec.owner_id))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "Privado");
    }

    #[tokio::test]
    async fn test_listing_and_count() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        store.records.lock().unwrap().extend([
            record(owner, "um", Duration::hours(2)),
            record(owner, "dois", Duration::hours(1)),
            record(Uuid::new_v4(), "outro", Duration::hours(1)),
        ]);

        let response = app(store.clone())
            .oneshot(get_as("/api/v1/content?page=0&size=1", owner))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert_eq!(json["items"][0]["title"], "dois");
        assert!(json["items"][0].get("text").is_none());

        let response = app(store)
            .oneshot(get_as("/api/v1/content/count", owner))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["total"], 2);
    }

    #[tokio::test]
    async fn test_download_is_zip_attachment() {
        let store = Arc::new(MemoryContentStore::default());
        let rec = record(Uuid::new_v4(), "Oração", Duration::hours(1));
        store.records.lock().unwrap().push(rec.clone());

        let uri = format!("/api/v1/content/{}/download", rec.content_id);
        let response = app(store).oneshot(get_as(&uri, rec.owner_id)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"Oracao_"));
        assert!(disposition.contains("filename*=UTF-8''Ora%C3%A7%C3%A3o_"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let store = Arc::new(MemoryContentStore::default());
        let rec = record(Uuid::new_v4(), "Apagar", Duration::hours(1));
        store.records.lock().unwrap().push(rec.clone());
        let uri = format!("/api/v1/content/{}", rec.content_id);

        let delete_as = |owner: Uuid| {
            Request::builder()
                .method("DELETE")
                .uri(uri.as_str())
                .header(OWNER_HEADER, owner.to_string())
                .body(Body::empty())
                .unwrap()
        };

        let response = app(store.clone()).oneshot(delete_as(Uuid::new_v4())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.all().len(), 1);

        let response = app(store.clone()).oneshot(delete_as(rec.owner_id)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.all().is_empty());
    }

    #[tokio::test]
    async fn test_store_outage_is_service_unavailable() {
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/content/{}", Uuid::new_v4()))
            .header(OWNER_HEADER, Uuid::new_v4().to_string())
            .body(Body::empty())
            .unwrap();
        let response = app(Arc::new(MemoryContentStore::failing()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["error"]["code"], "STORE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_personas_listing_matches_registered_handlers() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/api/v1/personas").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let personas: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["persona"].as_str().unwrap())
            .collect();
        assert_eq!(personas, vec!["GENERIC", "PRAYER", "STOICISM"]);
        assert!(!body[1]["prayer_styles"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_durations_listing() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/api/v1/durations").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), 9);
    }
}
