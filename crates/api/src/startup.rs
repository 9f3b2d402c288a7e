use crate::{
    db, health_handler, index_handler, precipitation, routes, stations, temperature_stats_from,
    temperature_stats_range, tobs, ClimateAccess, ClimateData, Database,
};
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_stats_from,
        routes::climate::climate_routes::temperature_stats_range,
        routes::health::health_handler,
    ),
    components(
        schemas(
                db::Precipitation,
                db::TemperatureObservation,
                db::TemperatureStats,
                routes::health::HealthStatus,
        )
    ),
    tags(
        (name = "climate observations api", description = "a read-only RESTful api over daily station precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub fn build_app_state(remote_url: String, database: Arc<Database>) -> AppState {
    AppState {
        remote_url,
        climate_db: Arc::new(ClimateAccess::new(database)),
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    // Static segments win over `{start}`, so the named routes never parse as dates.
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_stats_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_stats_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let started = time::OffsetDateTime::now_utc();
    let method = request.method().clone();
    let uri = request.uri().clone();
    info!(target: "http_request", "{} {}", method, uri);

    let response = next.run(request).await;
    info!(
        target: "http_response",
        "{} {} -> {} in {}",
        method,
        uri,
        response.status(),
        time::OffsetDateTime::now_utc() - started
    );

    response
}
