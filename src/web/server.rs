use axum::{
    routing::{get, post},
    Router,
};
use std::io;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::{spawn_refresh, Catalog, CatalogLoader};
use crate::config::Config;
use crate::shield::{ExpirationSweeper, SystemClock};

use super::api::health as health_handlers;
use super::api::satellites as satellite_handlers;
use super::api::shields as shield_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handlers::health))
        // Satellite visibility
        .route("/api/satellites", get(satellite_handlers::overhead))
        .route("/api/satellites/search", get(satellite_handlers::search))
        .route("/api/satellites/{id}", get(satellite_handlers::detail))
        // Privacy shields
        .route(
            "/api/privacy-shield",
            post(shield_handlers::activate).get(shield_handlers::list_active),
        )
        .route("/api/privacy-shield/{id}", get(shield_handlers::get_shield))
        .route(
            "/api/privacy-shield/{id}/extend",
            post(shield_handlers::extend),
        )
        .route(
            "/api/privacy-shield/{id}/deactivate",
            post(shield_handlers::deactivate),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let loader = CatalogLoader::new(
        config.catalog.catalog_file.clone(),
        config.catalog.tle_folder.clone(),
    );
    let catalog = Arc::new(Catalog::new());
    let initial = loader.clone();
    match tokio::task::spawn_blocking(move || initial.load()).await {
        Ok(Ok(snapshot)) => catalog.replace(snapshot),
        Ok(Err(e)) => log::error!("Initial catalog load failed, serving without catalog: {}", e),
        Err(e) => log::error!("Initial catalog load panicked: {}", e),
    }

    let state = AppState::new(&config, catalog.clone(), Arc::new(SystemClock))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let _refresh = config.catalog.refresh_interval.map(|period| {
        log::info!(
            "Refreshing catalog every {}",
            humantime::format_duration(period)
        );
        spawn_refresh(catalog.clone(), loader.clone(), period)
    });
    let _sweeper =
        ExpirationSweeper::new(state.shields.clone(), config.shields.sweep_interval).start();

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::catalog::CatalogSnapshot;
    use crate::config::VisibilityConfig;
    use crate::orbit::StateProvider;
    use crate::shield::{ShieldManager, ShieldPolicy};
    use crate::test_support::{hubble_record, iss_record, overhead_record, snapshot_of};
    use crate::visibility::{ObservationPoint, VisibilityEngine};

    const SF: (f64, f64) = (37.7749, -122.4194);

    fn state_with(catalog: Catalog) -> AppState {
        let engine = VisibilityEngine::new(
            StateProvider::new(Arc::new(catalog)),
            VisibilityConfig::default(),
        );
        AppState {
            engine: Arc::new(engine),
            shields: Arc::new(ShieldManager::new(
                ShieldPolicy::default(),
                Arc::new(SystemClock),
            )),
            station: ObservationPoint::new(SF.0, SF.1, None, Utc::now()).unwrap(),
        }
    }

    fn loaded_state() -> AppState {
        let snapshot: CatalogSnapshot = snapshot_of(vec![
            iss_record(),
            hubble_record(),
            overhead_record("sat-1", SF.0, SF.1, Utc::now()),
        ]);
        state_with(Catalog::with_snapshot(snapshot))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_catalog_size() {
        let app = router(loaded_state());
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["catalog_objects"], 3);
    }

    #[tokio::test]
    async fn overhead_lists_object_above_observer() {
        let app = router(loaded_state());
        let uri = format!("/api/satellites?lat={}&lng={}", SF.0, SF.1);
        let (status, body) = send(&app, "GET", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["satellites"][0]["id"], "sat-1");
        assert_eq!(
            body["count"].as_u64().unwrap() as usize,
            body["satellites"].as_array().unwrap().len()
        );
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn overhead_rejects_bad_coordinates() {
        let app = router(loaded_state());

        let (status, body) = send(&app, "GET", "/api/satellites?lat=95&lng=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_coordinates");

        let (status, body) = send(&app, "GET", "/api/satellites?lng=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
    }

    #[tokio::test]
    async fn overhead_without_catalog_is_unavailable() {
        let app = router(state_with(Catalog::new()));
        let (status, body) = send(&app, "GET", "/api/satellites?lat=0&lng=0", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "catalog_unavailable");
    }

    #[tokio::test]
    async fn search_and_detail() {
        let app = router(loaded_state());

        let (status, body) = send(&app, "GET", "/api/satellites/search?query=iss", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["id"], "25544");
        assert!(body["results"][0]["type"].is_string());

        let (status, _) = send(&app, "GET", "/api/satellites/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", "/api/satellites/sat-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["satellite"]["id"], "sat-1");
        assert!(body["position"]["latitude"].is_number());
        assert!(!body["next_passes"].as_array().unwrap().is_empty());

        let (status, body) = send(&app, "GET", "/api/satellites/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "satellite_not_found");

        let (status, _) = send(&app, "GET", "/api/satellites/sat-1?lat=10", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shield_lifecycle_over_http() {
        let app = router(loaded_state());
        let request = json!({
            "owner": "u1",
            "latitude": 40.7128,
            "longitude": -74.0060,
            "radius": 1.0,
            "shield_type": "basic"
        });

        let (status, shield) =
            send(&app, "POST", "/api/privacy-shield", Some(request.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(shield["status"], "active");
        assert_eq!(shield["shield_type"], "basic");
        let id = shield["shield_id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "POST", "/api/privacy-shield", Some(request)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "overlapping_shield");

        let (status, body) = send(&app, "GET", "/api/privacy-shield?owner=u1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/privacy-shield/{id}/extend"),
            Some(json!({ "duration": "30m" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shield_id"], id.as_str());

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/privacy-shield/{id}/extend"),
            Some(json!({ "duration": "10h" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duration_exceeds_cap");

        let uri = format!("/api/privacy-shield/{id}/deactivate");
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "deactivated");
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", &format!("/api/privacy-shield/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "deactivated");

        let (_, body) = send(&app, "GET", "/api/privacy-shield?owner=u1", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn shield_requests_are_validated() {
        let app = router(loaded_state());

        let (status, body) = send(
            &app,
            "POST",
            "/api/privacy-shield",
            Some(json!({ "latitude": 0.0, "longitude": 0.0, "radius": 2.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "radius_exceeds_tier");

        let (status, body) = send(
            &app,
            "POST",
            "/api/privacy-shield",
            Some(json!({ "latitude": 0.0, "longitude": 0.0, "shield_type": "ultra" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");

        let (status, _) = send(
            &app,
            "POST",
            "/api/privacy-shield",
            Some(json!({ "lat": 0.0, "lng": 0.0, "duration": "soon" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, shield) = send(
            &app,
            "POST",
            "/api/privacy-shield",
            Some(json!({ "lat": 0.0, "lng": 0.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(shield["owner"], "anonymous");

        let unknown = format!("/api/privacy-shield/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, "GET", &unknown, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "shield_not_found");

        let (status, _) = send(&app, "GET", "/api/privacy-shield/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn owner_accepted_as_user_id() {
        let app = router(loaded_state());

        let (status, shield) = send(
            &app,
            "POST",
            "/api/privacy-shield",
            Some(json!({ "user_id": "u1", "latitude": 40.7128, "longitude": -74.006 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(shield["owner"], "u1");

        let (_, body) = send(&app, "GET", "/api/privacy-shield?user_id=u1", None).await;
        assert_eq!(body["count"], 1);
        let (_, body) = send(&app, "GET", "/api/privacy-shield?owner=u1", None).await;
        assert_eq!(body["count"], 1);
        let (_, body) = send(&app, "GET", "/api/privacy-shield", None).await;
        assert_eq!(body["count"], 0);
    }
}
