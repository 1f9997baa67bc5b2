// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::catalog::CatalogKind;
use handlers::{assistant, auth, catalog, census, localities, reports};

pub use errors::ApiError;
pub use state::AppState;

/// Builds the HTTP router
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/login", post(auth::login))
        .route("/api/admins", post(auth::register_admin));

    // Name-only catalogs
    let app = catalog::routes(app, "/api/municipalities", CatalogKind::Municipality);
    let app = catalog::routes(app, "/api/housing-types", CatalogKind::HousingType);
    let app = catalog::routes(app, "/api/economic-activities", CatalogKind::EconomicActivity);

    app
        // Locality routes
        .route(
            "/api/municipalities/:id/localities",
            get(localities::list_by_municipality),
        )
        .route(
            "/api/localities",
            get(localities::list_localities).post(localities::create_locality),
        )
        .route(
            "/api/localities/:id",
            get(localities::get_locality)
                .put(localities::update_locality)
                .delete(localities::delete_locality),
        )
        // Dwelling routes
        .route(
            "/api/dwellings",
            get(census::list_dwellings).post(census::create_dwelling),
        )
        .route(
            "/api/dwellings/:id",
            get(census::get_dwelling)
                .put(census::update_dwelling)
                .delete(census::delete_dwelling),
        )
        .route(
            "/api/dwellings/:id/inhabitants",
            get(census::list_inhabitants).post(census::create_inhabitant),
        )
        .route(
            "/api/dwellings/:id/activities",
            get(census::list_activities),
        )
        .route(
            "/api/dwellings/:id/activities/:activity_id",
            put(census::associate_activity).delete(census::dissociate_activity),
        )
        // Inhabitant routes
        .route(
            "/api/inhabitants/:id",
            put(census::update_inhabitant).delete(census::delete_inhabitant),
        )
        // Report routes
        .route("/api/reports/population", get(reports::population))
        .route("/api/reports/housing-types", get(reports::housing_types))
        .route("/api/reports/ages", get(reports::ages))
        .route("/api/reports/age-distribution", get(reports::age_distribution))
        .route("/api/reports/localities", get(reports::locality_statistics))
        // Assistant
        .route("/api/assistant/ask", post(assistant::ask))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // Shared state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::QueryAssistant;
    use crate::auth::jwt::create_token;
    use crate::services::{AdminService, CatalogService, CensusService, ReportService};
    use crate::test_support::{FakeExecutor, FakeLanguageModel, InMemoryStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    fn state(store: &Arc<InMemoryStore>, assistant: Option<QueryAssistant>) -> AppState {
        let secret: Arc<str> = Arc::from(SECRET);
        AppState {
            admins: Arc::new(AdminService::new(store.clone(), secret.clone())),
            catalog: Arc::new(CatalogService::new(store.clone(), store.clone())),
            census: Arc::new(CensusService::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            reports: Arc::new(ReportService::new(store.clone())),
            assistant: assistant.map(Arc::new),
            jwt_secret: secret,
        }
    }

    fn token() -> String {
        create_token(1, "admin", SECRET).unwrap()
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token()));
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = router(state(&InMemoryStore::new(), None));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let app = router(state(&InMemoryStore::new(), None));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/municipalities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_rejected() {
        let app = router(state(&InMemoryStore::new(), None));
        let forged = create_token(1, "admin", "another-secret").unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/dwellings")
                    .header(header::AUTHORIZATION, format!("Bearer {}", forged))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_issues_token() {
        let store = InMemoryStore::new();
        let app_state = state(&store, None);
        app_state
            .admins
            .register("admin", "admin12345")
            .await
            .unwrap();

        let response = router(app_state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "username": "admin", "password": "admin12345" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["username"], "admin");
        assert!(body["token"].as_str().is_some());

        let (status, body) = send(
            router(app_state),
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "admin", "password": "wrong-password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn catalog_crud_over_http() {
        let store = InMemoryStore::new();
        let app = router(state(&store, None));

        let (status, created) = send(
            app.clone(),
            "POST",
            "/api/housing-types",
            Some(json!({ "name": "Departamento" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(
            app.clone(),
            "POST",
            "/api/housing-types",
            Some(json!({ "name": "Departamento" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, renamed) = send(
            app.clone(),
            "PUT",
            &format!("/api/housing-types/{}", id),
            Some(json!({ "name": "Dúplex" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["name"], "Dúplex");

        let (status, _) = send(app.clone(), "DELETE", &format!("/api/housing-types/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(app, "GET", &format!("/api/housing-types/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn blank_name_is_bad_request() {
        let app = router(state(&InMemoryStore::new(), None));
        let (status, _) = send(
            app,
            "POST",
            "/api/economic-activities",
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_body_field_is_json_bad_request() {
        let app = router(state(&InMemoryStore::new(), None));
        let (status, body) = send(
            app,
            "POST",
            "/api/dwellings",
            Some(json!({ "address": "Calle 1", "housing_type_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("locality_id"));
    }

    #[tokio::test]
    async fn malformed_path_and_query_are_json_bad_request() {
        let app = router(state(&InMemoryStore::new(), None));
        let (status, body) = send(app.clone(), "GET", "/api/dwellings/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) =
            send(app.clone(), "GET", "/api/reports/age-distribution?bins=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(app, "POST", "/api/assistant/ask", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("question"));
    }

    #[tokio::test]
    async fn dwelling_lifecycle_over_http() {
        let store = InMemoryStore::new();
        let municipality = store.add_catalog(CatalogKind::Municipality, "Saltillo");
        let locality = store.add_locality("Centro", municipality);
        let housing = store.add_catalog(CatalogKind::HousingType, "Casa");
        let activity = store.add_catalog(CatalogKind::EconomicActivity, "Comercio");
        let app = router(state(&store, None));

        let (status, dwelling) = send(
            app.clone(),
            "POST",
            "/api/dwellings",
            Some(json!({
                "address": "Calle Ficticia 123",
                "census_date": "2025-10-25",
                "locality_id": locality,
                "housing_type_id": housing
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(dwelling["census_date"], "2025-10-25");
        let id = dwelling["id"].as_i64().unwrap();

        let (status, person) = send(
            app.clone(),
            "POST",
            &format!("/api/dwellings/{}/inhabitants", id),
            Some(json!({ "full_name": "Ana García", "age": 42, "sex": "F" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(person["sex"], "F");

        let (status, _) = send(
            app.clone(),
            "PUT",
            &format!("/api/dwellings/{}/activities/{}", id, activity),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, detail) = send(app.clone(), "GET", &format!("/api/dwellings/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["inhabitant_count"], 1);
        assert_eq!(detail["municipality_name"], "Saltillo");
        assert_eq!(detail["inhabitants"][0]["full_name"], "Ana García");
        assert_eq!(detail["activities"][0]["name"], "Comercio");

        let (status, _) = send(
            app,
            "POST",
            &format!("/api/dwellings/{}/inhabitants", id),
            Some(json!({ "full_name": "Sin Edad", "sex": "M" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn age_distribution_report() {
        let store = InMemoryStore::new();
        let municipality = store.add_catalog(CatalogKind::Municipality, "Saltillo");
        let locality = store.add_locality("Centro", municipality);
        let housing = store.add_catalog(CatalogKind::HousingType, "Casa");
        let dwelling = store.add_dwelling("Calle 1", locality, housing);
        for age in [10, 20, 30] {
            store.add_inhabitant(dwelling, "Persona", age, crate::domain::census::Sex::Male);
        }
        let app = router(state(&store, None));

        let (status, body) = send(
            app,
            "GET",
            &format!("/api/reports/age-distribution?municipality_id={}&bins=2", municipality),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["bins"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn assistant_disabled_without_model() {
        let app = router(state(&InMemoryStore::new(), None));
        let (status, _) = send(
            app,
            "POST",
            "/api/assistant/ask",
            Some(json!({ "question": "¿Cuántos habitantes hay?" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn assistant_answers_over_http() {
        let model = Arc::new(FakeLanguageModel::new(vec![
            "SELECT COUNT(*) AS total FROM habitante",
            "Hay 4 habitantes.",
        ]));
        let executor = Arc::new(FakeExecutor::new(vec![json!({ "total": 4 })]));
        let assistant = QueryAssistant::new(model, executor);
        let app = router(state(&InMemoryStore::new(), Some(assistant)));

        let (status, body) = send(
            app,
            "POST",
            "/api/assistant/ask",
            Some(json!({ "question": "¿Cuántos habitantes hay?" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Hay 4 habitantes.");
        assert_eq!(body["sql"], "SELECT COUNT(*) AS total FROM habitante");
        assert_eq!(body["rows"][0]["total"], 4);
    }

    #[tokio::test]
    async fn assistant_rejects_unsafe_sql() {
        let model = Arc::new(FakeLanguageModel::new(vec!["DROP TABLE habitante"]));
        let executor = Arc::new(FakeExecutor::new(vec![]));
        let assistant = QueryAssistant::new(model, executor.clone());
        let app = router(state(&InMemoryStore::new(), Some(assistant)));

        let (status, _) = send(
            app,
            "POST",
            "/api/assistant/ask",
            Some(json!({ "question": "borra los habitantes" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(executor.executed().is_empty());
    }
}
