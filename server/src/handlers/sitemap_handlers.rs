use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        Path,
    },
    http::{header, HeaderName, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sitemap_service_cli::{SitemapError, SitemapInput, SubsetReport, SubsetRequest, SubsetSize};

use crate::state::AppState;
use crate::views;

/// The only failure text callers ever see; details go to the log.
pub const FAILURE_MESSAGE: &str =
    "Failed to process sitemap. Please check the input and try again.";

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
const X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

/// `subsetSize` as sent by JSON clients: a number, or digits in a string.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum SubsetSizeField {
    Number(i64),
    Text(String),
}

impl SubsetSizeField {
    fn parse(self) -> Result<SubsetSize, SitemapError> {
        match self {
            SubsetSizeField::Number(n) => SubsetSize::try_from(n),
            SubsetSizeField::Text(text) => text.parse(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsetPayload {
    pub sitemap_url: Option<String>,
    pub sitemap_content: Option<String>,
    pub subset_size: Option<SubsetSizeField>,
}

impl SubsetPayload {
    fn into_request(self) -> Result<SubsetRequest, SitemapError> {
        let subset_size = self
            .subset_size
            .ok_or_else(|| SitemapError::UnsupportedSubsetSize("missing".into()))?
            .parse()?;
        let input = SitemapInput::from_parts(
            self.sitemap_url.as_deref(),
            self.sitemap_content.as_deref(),
        )?;
        Ok(SubsetRequest { input, subset_size })
    }
}

/// Fields posted by the HTML form; every value arrives as text.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsetForm {
    pub sitemap_url: Option<String>,
    pub sitemap_content: Option<String>,
    pub subset_size: Option<String>,
}

impl SubsetForm {
    fn into_request(self) -> Result<SubsetRequest, SitemapError> {
        let subset_size: SubsetSize = self.subset_size.as_deref().unwrap_or("").parse()?;
        let input = SitemapInput::from_parts(
            self.sitemap_url.as_deref(),
            self.sitemap_content.as_deref(),
        )?;
        Ok(SubsetRequest { input, subset_size })
    }
}

#[derive(Serialize)]
pub struct SubsetResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: SubsetReport,
}

fn failure_status(err: &SitemapError) -> StatusCode {
    match err {
        err if err.is_input_error() => StatusCode::BAD_REQUEST,
        SitemapError::NetworkFailure { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn run(
    state: &AppState,
    request: Result<SubsetRequest, SitemapError>,
) -> Result<SubsetReport, SitemapError> {
    let result = match request {
        Ok(request) => state.generator.generate(&request).await,
        Err(err) => Err(err),
    };
    if let Err(err) = &result {
        tracing::warn!(error = ?err, "failed to process sitemap");
    }
    result
}

/// GET /
pub async fn index() -> Html<String> {
    Html(views::index_page(false))
}

fn json_failure(status: StatusCode) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(json!({ "success": false, "error": FAILURE_MESSAGE })),
    )
}

/// POST /api/sitemaps
pub async fn submit_json(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SubsetPayload>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected sitemap payload");
            return json_failure(StatusCode::BAD_REQUEST);
        }
    };
    match run(&state, payload.into_request()).await {
        Ok(report) => (
            StatusCode::CREATED,
            Json(json!(SubsetResponse {
                success: true,
                report,
            })),
        ),
        Err(err) => json_failure(failure_status(&err)),
    }
}

/// POST /generate
pub async fn submit_form(
    Extension(state): Extension<AppState>,
    form: Result<Form<SubsetForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected sitemap form");
            return (StatusCode::BAD_REQUEST, Html(views::index_page(true))).into_response();
        }
    };
    match run(&state, form.into_request()).await {
        Ok(report) => Redirect::to(&format!("/sitemap/{}", report.sitemap_id)).into_response(),
        Err(err) => (failure_status(&err), Html(views::index_page(true))).into_response(),
    }
}

/// GET /sitemap/{id}
pub async fn get_sitemap(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.generator.store().load(&id).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, XML_CONTENT_TYPE),
                (X_ROBOTS_TAG, "noindex"),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Sitemap not found").into_response(),
    }
}
