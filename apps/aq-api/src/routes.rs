use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;

use aq_domain::{
	DiscoveryPage, QueryParams,
	query::{first_value, parse_limit},
};
use aq_service::{
	CatalogOverview, DiscoveryDetail, Error, FeaturedPage, PairPage, PairParams, WriteOperation,
	parse_discovery_id,
};

use crate::state::AppState;

/// Decoded query string in request order. Repeated keys are resolved first-wins downstream.
type RawPairs = Query<Vec<(String, String)>>;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route(
			"/api/discoveries",
			get(list_discoveries).options(catalog_overview).post(create_discovery),
		)
		.route("/api/discoveries/stats", get(catalog_overview))
		.route("/api/discoveries/featured", get(featured_discoveries))
		.route(
			"/api/discoveries/{id}",
			get(get_discovery).put(update_discovery).delete(delete_discovery),
		)
		.route("/api/pairs", get(list_pairs).post(create_pair))
		.with_state(state)
}

async fn list_discoveries(
	State(state): State<AppState>,
	Query(pairs): RawPairs,
) -> Result<Json<DiscoveryPage>, ApiError> {
	let params = QueryParams::from_pairs(pairs);
	let response = state.service.list_discoveries(&params).await?;

	Ok(Json(response))
}

async fn catalog_overview(
	State(state): State<AppState>,
) -> Result<Json<CatalogOverview>, ApiError> {
	let response = state.service.catalog_overview().await?;

	Ok(Json(response))
}

async fn featured_discoveries(
	State(state): State<AppState>,
	Query(pairs): RawPairs,
) -> Result<Json<FeaturedPage>, ApiError> {
	let limit = first_value(&pairs, "limit").and_then(parse_limit);
	let response = state.service.featured_discoveries(limit).await?;

	Ok(Json(response))
}

async fn get_discovery(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<DiscoveryDetail>, ApiError> {
	let id = parse_discovery_id(&id)?;
	let response = state.service.get_discovery(id).await?;

	Ok(Json(response))
}

async fn list_pairs(
	State(state): State<AppState>,
	Query(pairs): RawPairs,
) -> Result<Json<PairPage>, ApiError> {
	let params = PairParams::from_pairs(pairs);
	let response = state.service.list_pairs(&params).await?;

	Ok(Json(response))
}

async fn create_discovery(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
	reject(&state, WriteOperation::CreateDiscovery)
}

async fn update_discovery(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
	reject(&state, WriteOperation::UpdateDiscovery)
}

async fn delete_discovery(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
	reject(&state, WriteOperation::DeleteDiscovery)
}

async fn create_pair(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
	reject(&state, WriteOperation::CreatePair)
}

fn reject(state: &AppState, operation: WriteOperation) -> Result<StatusCode, ApiError> {
	state.service.reject_write(operation)?;

	Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::InvalidInput { message } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"INVALID_INPUT",
				message,
				Some(vec!["$.id".to_string()]),
			),
			Error::StoreUnavailable { message } =>
				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", message, None),
			Error::NotSupported { operation } => ApiError::new(
				StatusCode::NOT_IMPLEMENTED,
				"NOT_SUPPORTED",
				format!("{operation} is not supported by this read-only API."),
				None,
			),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
