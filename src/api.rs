//! REST API for the shipping calculator.
//!
//! Provides HTTP endpoints for the frontend: cost calculation (plain and
//! streamed), the text report and the reference catalog.
//! Uses Axum as the web framework and supports CORS.

use std::sync::{Arc, OnceLock};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::catalog::Catalog;
use crate::config::ApiConfig;
use crate::cost::ShippingResult;
use crate::diagnostics::render_all;
use crate::model::{
    CostBasis, Location, Package, PalletSize, ProductCategory, ShippingCostConfig,
    ValidationError,
};
use crate::report::render_report;
use crate::shipment::{
    LayoutPreview, ShipmentContext, calculate_shipment_with_config,
    calculate_shipment_with_progress, layout_preview,
};
use crate::stacking::EngineConfig;
use crate::units::LengthUnit;

/// Shared, read-only state of all handlers.
#[derive(Clone)]
pub struct ApiState {
    catalog: Arc<Catalog>,
    engine: EngineConfig,
    default_use_pallet: bool,
}

impl ApiState {
    pub fn new(catalog: Catalog, engine: EngineConfig, default_use_pallet: bool) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine,
            default_use_pallet,
        }
    }
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>shipping_calc API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
</html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Pallet choice: a catalog entry or dimensions entered by hand.
#[derive(Deserialize, Clone, Debug, ToSchema)]
#[serde(untagged)]
pub enum PalletSelection {
    Catalog {
        catalog_id: String,
    },
    Custom {
        length: f64,
        width: f64,
        height: f64,
        max_weight: f64,
        length_unit: LengthUnit,
    },
}

#[derive(Deserialize, Clone, ToSchema)]
#[schema(
    example = json!({
        "packages": [
            {
                "length": 40.0, "width": 30.0, "height": 20.0,
                "weight": 5.0, "quantity": 10,
                "length_unit": "cm", "weight_unit": "kg"
            }
        ],
        "pallet": { "catalog_id": "eur1" },
        "from_location_id": "kingston",
        "to_location_id": "miami",
        "cost_config": {
            "basis": { "type": "weight", "unit": "kg" },
            "rate_per_unit": 2.5,
            "currency": "USD",
            "tax_rate": 15.0
        },
        "use_pallet": true
    })
)]
pub struct CalculateRequest {
    pub packages: Vec<Package>,
    pub pallet: PalletSelection,
    pub from_location_id: String,
    pub to_location_id: String,
    pub cost_config: ShippingCostConfig,
    #[serde(default)]
    #[schema(nullable = true)]
    pub use_pallet: Option<bool>,
}

#[derive(Debug)]
struct ValidatedCalculation {
    packages: Vec<Package>,
    pallet: PalletSize,
    from: Location,
    to: Location,
    cost_config: ShippingCostConfig,
    use_pallet: Option<bool>,
}

impl ValidatedCalculation {
    fn context(&self) -> ShipmentContext<'_> {
        ShipmentContext {
            from: &self.from,
            to: &self.to,
            pallet: &self.pallet,
            cost_config: &self.cost_config,
        }
    }

    fn use_pallet_or(&self, default: bool) -> bool {
        self.use_pallet.unwrap_or(default)
    }
}

#[derive(Debug, Error)]
enum RequestError {
    #[error("Package #{index}: {source}")]
    InvalidPackage {
        index: usize,
        #[source]
        source: ValidationError,
    },
    #[error("{0}")]
    InvalidPallet(ValidationError),
    #[error("{0}")]
    InvalidCostConfig(ValidationError),
    #[error("Unknown pallet '{0}'")]
    UnknownPallet(String),
    #[error("Unknown location '{0}'")]
    UnknownLocation(String),
}

impl RequestError {
    fn title(&self) -> &'static str {
        match self {
            RequestError::InvalidPackage { .. } => "Invalid input data",
            RequestError::InvalidPallet(_) => "Invalid pallet configuration",
            RequestError::InvalidCostConfig(_) => "Invalid cost configuration",
            RequestError::UnknownPallet(_) | RequestError::UnknownLocation(_) => {
                "Unknown reference"
            }
        }
    }
}

impl CalculateRequest {
    fn into_validated(self, catalog: &Catalog) -> Result<ValidatedCalculation, RequestError> {
        for (idx, package) in self.packages.iter().enumerate() {
            package
                .validate()
                .map_err(|source| RequestError::InvalidPackage {
                    index: idx + 1,
                    source,
                })?;
        }

        let pallet = match self.pallet {
            PalletSelection::Catalog { catalog_id } => catalog
                .pallet(&catalog_id)
                .cloned()
                .ok_or(RequestError::UnknownPallet(catalog_id))?,
            PalletSelection::Custom {
                length,
                width,
                height,
                max_weight,
                length_unit,
            } => PalletSize::custom((length, width, height), max_weight, length_unit)
                .map_err(RequestError::InvalidPallet)?,
        };

        let from = lookup_location(catalog, self.from_location_id)?;
        let to = lookup_location(catalog, self.to_location_id)?;

        self.cost_config
            .validate()
            .map_err(RequestError::InvalidCostConfig)?;

        Ok(ValidatedCalculation {
            packages: self.packages,
            pallet,
            from,
            to,
            cost_config: self.cost_config,
            use_pallet: self.use_pallet,
        })
    }
}

fn lookup_location(catalog: &Catalog, id: String) -> Result<Location, RequestError> {
    catalog
        .location(&id)
        .cloned()
        .ok_or(RequestError::UnknownLocation(id))
}

/// A warning or recommendation with its stable code.
#[derive(Serialize, ToSchema)]
pub struct DiagnosticEntry {
    pub code: String,
    pub message: String,
}

/// Stacking of the combined package, for drawing the load.
///
/// Dimensions are millimeters.
#[derive(Serialize, ToSchema)]
pub struct LayoutResponse {
    #[schema(value_type = [f64; 3], example = json!([621.4, 621.4, 621.4]))]
    pub package_dims: (f64, f64, f64),
    #[schema(value_type = [f64; 3], example = json!([1200.0, 800.0, 144.0]))]
    pub pallet_dims: (f64, f64, f64),
    pub items_per_layer: u32,
    pub layers: u32,
    pub total_items: u32,
    pub pallets_needed: u32,
    /// Stacking derivation, in the order it was computed.
    pub calculations: Vec<String>,
}

impl From<LayoutPreview> for LayoutResponse {
    fn from(preview: LayoutPreview) -> Self {
        let LayoutPreview {
            package,
            pallet,
            stacking,
        } = preview;
        Self {
            package_dims: (package.length, package.width, package.height),
            pallet_dims: (pallet.length, pallet.width, pallet.height),
            items_per_layer: stacking.items_per_layer,
            layers: stacking.layers,
            total_items: stacking.total_items,
            pallets_needed: stacking.pallets_needed,
            calculations: render_all(&stacking.calculations),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CalculateResponse {
    pub shipping_cost: f64,
    pub tax: f64,
    pub total_cost: f64,
    pub pallets_needed: u32,
    /// Kilograms, pallets included.
    pub total_weight: f64,
    pub currency_code: String,
    pub use_pallet: bool,
    pub warnings: Vec<DiagnosticEntry>,
    pub recommendations: Vec<DiagnosticEntry>,
    pub calculations: Vec<String>,
    #[schema(nullable = true)]
    pub layout: Option<LayoutResponse>,
}

impl CalculateResponse {
    fn from_result(result: ShippingResult, use_pallet: bool, layout: Option<LayoutPreview>) -> Self {
        let calculations = result.calculation_lines();
        let ShippingResult {
            shipping_cost,
            tax,
            total_cost,
            pallets_needed,
            total_weight,
            currency_code,
            warnings,
            recommendations,
            ..
        } = result;

        Self {
            shipping_cost,
            tax,
            total_cost,
            pallets_needed,
            total_weight,
            currency_code,
            use_pallet,
            warnings: warnings
                .iter()
                .map(|w| DiagnosticEntry {
                    code: w.code().to_string(),
                    message: w.to_string(),
                })
                .collect(),
            recommendations: recommendations
                .iter()
                .map(|r| DiagnosticEntry {
                    code: r.code().to_string(),
                    message: r.to_string(),
                })
                .collect(),
            calculations,
            layout: layout.map(LayoutResponse::from),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.body_text(),
    )
}

fn parse_calculate_request(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
    catalog: &Catalog,
) -> Result<ValidatedCalculation, Response> {
    let Json(payload) = payload.map_err(json_deserialize_error)?;

    payload.into_validated(catalog).map_err(|err| {
        warn!("Rejected calculation request: {err}");
        error_response(StatusCode::UNPROCESSABLE_ENTITY, err.title(), err.to_string())
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_calculate, handle_calculate_stream, handle_report, handle_catalog),
    components(
        schemas(
            CalculateRequest,
            PalletSelection,
            CalculateResponse,
            DiagnosticEntry,
            LayoutResponse,
            ErrorResponse,
            Package,
            ShippingCostConfig,
            CostBasis,
            Catalog,
            PalletSize,
            Location,
            ProductCategory
        )
    ),
    tags((name = "shipping", description = "Shipping cost and pallet calculations"))
)]
struct ApiDoc;

/// Builds the application router.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/calculate", post(handle_calculate))
        .route("/calculate_stream", post(handle_calculate_stream))
        .route("/report", post(handle_report))
        .route("/catalog", get(handle_catalog))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until the server stops.
pub async fn start_api_server(config: &ApiConfig, state: ApiState) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() {
        info!("Local access: http://localhost:{}", config.port());
    }
    info!("API endpoints: POST /calculate, POST /calculate_stream, POST /report, GET /catalog");
    info!("Documentation: GET /docs, GET /docs/openapi.json");

    axum::serve(listener, router(state)).await
}

/// Handler for POST /calculate.
///
/// Returns costs, diagnostics and the layout of the combined load.
#[utoipa::path(
    post,
    path = "/calculate",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Calculation finished", body = CalculateResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or unknown catalog reference",
            body = ErrorResponse
        )
    ),
    tag = "shipping"
)]
async fn handle_calculate(
    State(state): State<ApiState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let request = match parse_calculate_request(payload, &state.catalog) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let use_pallet = request.use_pallet_or(state.default_use_pallet);
    info!(
        packages = request.packages.len(),
        pallet = %request.pallet.id,
        use_pallet,
        "New calculation request"
    );

    let result =
        calculate_shipment_with_config(&request.packages, &request.context(), use_pallet, &state.engine);
    let layout = layout_preview(&request.packages, &request.pallet, &state.engine);
    info!(
        "Result: {} {:.2} total, {} pallets, {} warnings",
        result.currency_code,
        result.total_cost,
        result.pallets_needed,
        result.warnings.len()
    );

    let response = CalculateResponse::from_result(result, use_pallet, layout);
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /calculate_stream (SSE).
///
/// Streams calculation progress as Server-Sent Events (text/event-stream).
#[utoipa::path(
    post,
    path = "/calculate_stream",
    request_body = CalculateRequest,
    responses(
        (
            status = 200,
            description = "Streams calculation events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or unknown catalog reference",
            body = ErrorResponse
        )
    ),
    tag = "shipping"
)]
async fn handle_calculate_stream(
    State(state): State<ApiState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let request = match parse_calculate_request(payload, &state.catalog) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let use_pallet = request.use_pallet_or(state.default_use_pallet);
    let engine = state.engine;
    let (tx, rx) = mpsc::channel::<String>(32);

    tokio::task::spawn_blocking(move || {
        calculate_shipment_with_progress(
            &request.packages,
            &request.context(),
            use_pallet,
            &engine,
            |evt| {
                if let Ok(json) = serde_json::to_string(evt) {
                    // a closed receiver only means the client went away
                    let _ = tx.blocking_send(json);
                }
            },
        );
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Handler for POST /report.
///
/// Runs the calculation and returns the plain-text report.
#[utoipa::path(
    post,
    path = "/report",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Shipping report", content_type = "text/plain", body = String),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or unknown catalog reference",
            body = ErrorResponse
        )
    ),
    tag = "shipping"
)]
async fn handle_report(
    State(state): State<ApiState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let request = match parse_calculate_request(payload, &state.catalog) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let use_pallet = request.use_pallet_or(state.default_use_pallet);
    let result =
        calculate_shipment_with_config(&request.packages, &request.context(), use_pallet, &state.engine);
    let report = render_report(&request.packages, &result, use_pallet);

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report,
    )
        .into_response()
}

/// Handler for GET /catalog.
#[utoipa::path(
    get,
    path = "/catalog",
    responses((status = 200, description = "Pallets, locations and product categories", body = Catalog)),
    tag = "shipping"
)]
async fn handle_catalog(State(state): State<ApiState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn state(default_use_pallet: bool) -> ApiState {
        let catalog = Catalog::embedded().expect("embedded catalog must load");
        ApiState::new(catalog, EngineConfig::default(), default_use_pallet)
    }

    fn request_json(pallet: serde_json::Value, use_pallet: serde_json::Value) -> serde_json::Value {
        json!({
            "packages": [{
                "length": 40.0, "width": 30.0, "height": 20.0,
                "weight": 5.0, "quantity": 10,
                "length_unit": "cm", "weight_unit": "kg"
            }],
            "pallet": pallet,
            "from_location_id": "kingston",
            "to_location_id": "miami",
            "cost_config": {
                "basis": { "type": "weight", "unit": "kg" },
                "rate_per_unit": 2.0,
                "currency": "USD",
                "tax_rate": 10.0
            },
            "use_pallet": use_pallet
        })
    }

    async fn post(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let paths = &openapi_doc().paths.paths;
        for path in ["/calculate", "/calculate_stream", "/report", "/catalog"] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {path} path"
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let components = openapi_doc()
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        for name in ["CalculateRequest", "CalculateResponse", "ErrorResponse", "Catalog"] {
            assert!(
                components.schemas.contains_key(name),
                "Expected schema '{name}' is missing from OpenAPI spec"
            );
        }
    }

    #[test]
    fn pallet_selection_accepts_catalog_id_and_custom_dims() {
        let selection: PalletSelection =
            serde_json::from_value(json!({ "catalog_id": "eur1" })).unwrap();
        assert!(matches!(selection, PalletSelection::Catalog { catalog_id } if catalog_id == "eur1"));

        let selection: PalletSelection = serde_json::from_value(json!({
            "length": 100.0, "width": 100.0, "height": 10.0,
            "max_weight": 800.0, "length_unit": "cm"
        }))
        .unwrap();
        assert!(matches!(
            selection,
            PalletSelection::Custom { length_unit: LengthUnit::Centimeter, .. }
        ));
    }

    #[test]
    fn use_pallet_absent_or_null_falls_back_to_default() {
        let catalog = Catalog::embedded().unwrap();
        for use_pallet in [json!(null), json!(true), json!(false)] {
            let request: CalculateRequest =
                serde_json::from_value(request_json(json!({ "catalog_id": "eur1" }), use_pallet.clone()))
                    .unwrap();
            let validated = request.into_validated(&catalog).unwrap();
            match use_pallet.as_bool() {
                Some(explicit) => {
                    assert_eq!(validated.use_pallet_or(!explicit), explicit);
                }
                None => {
                    assert!(validated.use_pallet_or(true));
                    assert!(!validated.use_pallet_or(false));
                }
            }
        }
    }

    #[test]
    fn unknown_references_are_rejected() {
        let catalog = Catalog::embedded().unwrap();

        let request: CalculateRequest =
            serde_json::from_value(request_json(json!({ "catalog_id": "nope" }), json!(null))).unwrap();
        assert!(matches!(
            request.into_validated(&catalog),
            Err(RequestError::UnknownPallet(id)) if id == "nope"
        ));

        let mut body = request_json(json!({ "catalog_id": "eur1" }), json!(null));
        body["to_location_id"] = json!("atlantis");
        let request: CalculateRequest = serde_json::from_value(body).unwrap();
        assert!(matches!(
            request.into_validated(&catalog),
            Err(RequestError::UnknownLocation(id)) if id == "atlantis"
        ));
    }

    #[test]
    fn custom_pallet_is_validated() {
        let catalog = Catalog::embedded().unwrap();
        let request: CalculateRequest = serde_json::from_value(request_json(
            json!({
                "length": -1.0, "width": 100.0, "height": 10.0,
                "max_weight": 800.0, "length_unit": "cm"
            }),
            json!(null),
        ))
        .unwrap();
        let err = request.into_validated(&catalog).unwrap_err();
        assert_eq!(err.title(), "Invalid pallet configuration");
    }

    #[tokio::test]
    async fn calculate_returns_costs_and_layout() {
        let (status, body) = post(
            router(state(false)),
            "/calculate",
            request_json(json!({ "catalog_id": "eur1" }), json!(false)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!((value["shipping_cost"].as_f64().unwrap() - 100.0).abs() < 1e-6);
        assert!((value["tax"].as_f64().unwrap() - 10.0).abs() < 1e-6);
        assert!((value["total_cost"].as_f64().unwrap() - 110.0).abs() < 1e-6);
        assert_eq!(value["pallets_needed"], 1);
        assert_eq!(value["currency_code"], "USD");
        assert_eq!(value["use_pallet"], false);
        assert!(value["calculations"].as_array().unwrap().len() > 5);
        assert_eq!(value["layout"]["total_items"], 1);
        assert_eq!(value["layout"]["pallet_dims"][0].as_f64().unwrap(), 1200.0);
        // 0.24 m³ cube: side ≈ 621.4 mm, one per layer on a 1200×800 pallet
        assert_eq!(
            value["layout"]["calculations"],
            json!([
                "Items per row: 1",
                "Rows per layer: 1",
                "Total items per layer: 1",
                "Maximum layers possible: 1",
                "Total stack height: 765mm",
                "Items per pallet: 1",
                "Pallets needed: 1"
            ])
        );
    }

    #[tokio::test]
    async fn calculate_rejects_invalid_input_with_422() {
        let mut body = request_json(json!({ "catalog_id": "eur1" }), json!(null));
        body["packages"][0]["weight"] = json!(-3.0);
        let (status, bytes) = post(router(state(false)), "/calculate", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "Invalid input data");
        assert!(value["details"].as_str().unwrap().starts_with("Package #1"));

        let (status, bytes) =
            post(router(state(false)), "/calculate", json!({ "packages": "nope" })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "Invalid JSON data");
    }

    #[tokio::test]
    async fn report_is_plain_text() {
        let (status, bytes) = post(
            router(state(true)),
            "/report",
            request_json(json!({ "catalog_id": "eur1" }), json!(null)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Shipping Calculation Report"));
        assert!(text.contains("Pallets Needed: 1"));
        assert!(text.contains("Package 1 calculations:"));
    }

    #[tokio::test]
    async fn stream_ends_with_finished_event() {
        let (status, bytes) = post(
            router(state(true)),
            "/calculate_stream",
            request_json(json!({ "catalog_id": "eur1" }), json!(null)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"type\":\"PackageCosted\""));
        assert!(text.contains("\"type\":\"Finished\""));
    }

    #[tokio::test]
    async fn catalog_lists_reference_data() {
        let response = router(state(false))
            .oneshot(Request::builder().uri("/catalog").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let catalog: Catalog = serde_json::from_slice(&bytes).unwrap();
        assert!(catalog.pallet("eur1").is_some());
    }
}
