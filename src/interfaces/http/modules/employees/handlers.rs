//! Employee CRUD handlers
//!
//! Thin wrappers over `EmployeeService`; all rules live in the service and
//! the reconciler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{CreateEmployeeBody, EmployeeDto, UpdateEmployeeBody};
use crate::application::EmployeeService;
use crate::interfaces::http::common::{domain_error_response, ApiError, ApiResponse, ValidatedJson};

/// Employee handler state
#[derive(Clone)]
pub struct EmployeeHandlerState {
    pub service: Arc<EmployeeService>,
}

fn to_dtos(employees: Vec<crate::domain::Employee>) -> Vec<EmployeeDto> {
    employees.into_iter().map(EmployeeDto::from).collect()
}

#[utoipa::path(
    post,
    path = "/employees/create",
    tag = "Employees",
    request_body = CreateEmployeeBody,
    responses(
        (status = 200, description = "Employee created", body = ApiResponse<String>),
        (status = 400, description = "Invalid body or field rules violated"),
        (status = 409, description = "Employee id already exists"),
        (status = 500, description = "Unexpected failure")
    )
)]
pub async fn create_employee(
    State(state): State<EmployeeHandlerState>,
    ValidatedJson(body): ValidatedJson<CreateEmployeeBody>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state
        .service
        .create(body.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        "Employee created successfully".to_string(),
    )))
}

#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee with phone numbers and voter record", body = ApiResponse<EmployeeDto>),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(
    State(state): State<EmployeeHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    let employee = state
        .service
        .get_by_id(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(employee.into())))
}

#[utoipa::path(
    get,
    path = "/employees/managers/{manager_id}",
    tag = "Employees",
    params(("manager_id" = i32, Path, description = "Manager id")),
    responses(
        (status = 200, description = "Employees reporting to the manager, possibly empty", body = ApiResponse<Vec<EmployeeDto>>)
    )
)]
pub async fn list_employees_by_manager(
    State(state): State<EmployeeHandlerState>,
    Path(manager_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EmployeeDto>>>, ApiError> {
    let employees = state
        .service
        .get_by_manager_id(manager_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(to_dtos(employees))))
}

#[utoipa::path(
    put,
    path = "/employees/update/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    request_body = UpdateEmployeeBody,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<EmployeeDto>),
        (status = 400, description = "Invalid body or field rules violated"),
        (status = 404, description = "Employee (or referenced phone) not found")
    )
)]
pub async fn update_employee(
    State(state): State<EmployeeHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateEmployeeBody>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    let employee = state
        .service
        .update(id, body.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(employee.into())))
}

#[utoipa::path(
    delete,
    path = "/employees/delete/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deleted (or did not exist)", body = ApiResponse<String>)
    )
)]
pub async fn delete_employee(
    State(state): State<EmployeeHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state
        .service
        .delete(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        "Employee deleted successfully".to_string(),
    )))
}

#[utoipa::path(
    get,
    path = "/employees",
    tag = "Employees",
    responses(
        (status = 200, description = "All employees, possibly empty", body = ApiResponse<Vec<EmployeeDto>>)
    )
)]
pub async fn list_employees(
    State(state): State<EmployeeHandlerState>,
) -> Result<Json<ApiResponse<Vec<EmployeeDto>>>, ApiError> {
    let employees = state
        .service
        .get_all()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(to_dtos(employees))))
}
