//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::employees::{self, EmployeeDto, EmployeeHandlerState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use crate::application::EmployeeService;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        employees::create_employee,
        employees::get_employee,
        employees::list_employees_by_manager,
        employees::update_employee,
        employees::delete_employee,
        employees::list_employees,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ApiResponse<EmployeeDto>,
            ApiResponse<Vec<EmployeeDto>>,
            health::HealthResponse,
            health::ComponentHealth,
            employees::CreateEmployeeBody,
            employees::UpdateEmployeeBody,
            employees::PhoneNumberInput,
            employees::VoterIdInput,
            employees::EmployeeDto,
            employees::PhoneNumberDto,
            employees::VoterIdDto,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Employees", description = "Employee aggregates: phone numbers and voter record included"),
    ),
    info(
        title = "Employee Registry API",
        version = "1.0.0",
        description = "REST API for managing employees, their phone numbers and voter records"
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running service.
pub struct ApiContext {
    pub service: Arc<EmployeeService>,
    /// Pinged by `/health`; `None` for the in-memory repository
    pub db: Option<DatabaseConnection>,
    pub prometheus: PrometheusHandle,
}

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let employee_state = EmployeeHandlerState {
        service: ctx.service,
    };

    let employee_routes = Router::new()
        .route("/employees", get(employees::list_employees))
        .route("/employees/create", post(employees::create_employee))
        .route("/employees/{id}", get(employees::get_employee))
        .route(
            "/employees/managers/{manager_id}",
            get(employees::list_employees_by_manager),
        )
        .route("/employees/update/{id}", put(employees::update_employee))
        .route("/employees/delete/{id}", delete(employees::delete_employee))
        .with_state(employee_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db: ctx.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: ctx.prometheus,
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(employee_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}
