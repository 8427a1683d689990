use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/favorites", post(handlers::add_favorite))
        .route("/api/favorites/{user_id}", get(handlers::list_favorites))
        .route(
            "/api/favorites/{user_id}/{course_id}",
            get(handlers::is_favorite).delete(handlers::remove_favorite),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::in_memory())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_add_list_remove_scenario() {
        let app = app();

        let response = send(
            &app,
            Method::POST,
            "/api/favorites",
            Some(json!({ "userId": "u1", "courseId": "c1", "courseTitle": "Intro" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(created["createdAt"].as_str().is_some());
        assert_eq!(created["courseTitle"], "Intro");

        let response = send(&app, Method::GET, "/api/favorites/u1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
        assert_eq!(listed[0]["courseId"], "c1");

        let response = send(&app, Method::GET, "/api/favorites/u1/c1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(true));

        let response = send(&app, Method::DELETE, "/api/favorites/u1/c1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());

        let response = send(&app, Method::GET, "/api/favorites/u1/c1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(false));

        let response = send(&app, Method::GET, "/api/favorites/u1", None).await;
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_user_lists_empty() {
        let response = send(&app(), Method::GET, "/api/favorites/nonexistent-user", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_delete_missing_favorite_is_ok() {
        let response = send(&app(), Method::DELETE, "/api/favorites/u1/nothing", None).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_client_supplied_id_and_created_at_are_ignored() {
        let response = send(
            &app(),
            Method::POST,
            "/api/favorites",
            Some(json!({
                "id": "client-id",
                "userId": "u1",
                "courseId": "c1",
                "createdAt": "2000-01-01T00:00:00"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_ne!(created["id"], "client-id");
        assert_ne!(created["createdAt"], "2000-01-01T00:00:00");
    }

    #[tokio::test]
    async fn test_null_identifiers_are_accepted() {
        let app = app();

        let response = send(
            &app,
            Method::POST,
            "/api/favorites",
            Some(json!({ "userId": null, "courseId": "c1" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["userId"], "");
        assert_eq!(created["courseId"], "c1");
    }

    #[tokio::test]
    async fn test_duplicate_posts_create_two_records() {
        let app = app();
        let body = json!({ "userId": "u1", "courseId": "c1" });

        let first = body_json(send(&app, Method::POST, "/api/favorites", Some(body.clone())).await).await;
        let second = body_json(send(&app, Method::POST, "/api/favorites", Some(body)).await).await;

        assert_ne!(first["id"], second["id"]);

        let listed = body_json(send(&app, Method::GET, "/api/favorites/u1", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_client_error() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/favorites")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/favorites/u1")
            .header(header::ORIGIN, "https://courses.example.com")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_health_reports_store_status() {
        let response = send(&app(), Method::GET, "/api/health", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "healthy");
    }
}
