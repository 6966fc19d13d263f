use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};

use serde::Serialize;
use tracing::error;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{openapi, ToSchema};

use validator::ValidationErrors;

use crate::domain;
use crate::routes::Route;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToSchema)]
#[schema(example = json!({
    "error_code": "not_found",
    "error_description": "The requested entity could not be found.",
    "extra_info": null
}))]
pub struct BasicErrorResponse {
    /// One of "invalid_input", "invalid_json", "not_found", "conflict" or "internal_error"
    error_code: String,
    error_description: String,
    extra_info: Option<ExtraInfo>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum ExtraInfo {
    ValidationIssues(ValidationErrorSchema),
    Message(String),
}

/// Stand-in OpenAPI schema for [ValidationErrors] which just provides an empty object
#[derive(Serialize, Debug)]
#[serde(transparent)]
pub struct ValidationErrorSchema(ValidationErrors);

impl<'schem> ToSchema<'schem> for ValidationErrorSchema {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "ValidationErrorSchema",
            openapi::ObjectBuilder::new().into(),
        )
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(BasicErrorResponse {
            error_code: "not_found".into(),
            error_description: "The requested entity could not be found.".into(),
            extra_info: None,
        }),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(BasicErrorResponse {
            error_code: "internal_error".into(),
            error_description: "Could not access data to complete your request".into(),
            extra_info: None,
        }),
    )
        .into_response()
}

/// Response type that wraps domain errors and turns them into [BasicErrorResponse]s
pub struct DomainErrorResponse(pub domain::Error);

impl IntoResponse for DomainErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            domain::Error::Invalid(errors) => ValidationErrorResponse(errors).into_response(),
            domain::Error::DoesNotExist => not_found(),
            domain::Error::Conflict => (
                StatusCode::CONFLICT,
                axum::Json(BasicErrorResponse {
                    error_code: "conflict".into(),
                    error_description: "The change conflicts with data that already exists."
                        .into(),
                    extra_info: None,
                }),
            )
                .into_response(),
            err @ domain::Error::RetrieveFailure { .. } => {
                error!("Request failed: {:#}", anyhow::Error::new(err));
                internal_error()
            }
        }
    }
}

impl From<domain::Error> for DomainErrorResponse {
    fn from(value: domain::Error) -> Self {
        Self(value)
    }
}

/// Response type for infrastructure failures outside the domain, such as a transaction
/// that couldn't be started or committed
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        internal_error()
    }
}

/// Response type that wraps validation errors and turns them into [BasicErrorResponse]s
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: "invalid_input".into(),
                error_description: "Submitted data was invalid.".to_owned(),
                extra_info: Some(ExtraInfo::ValidationIssues(ValidationErrorSchema(self.0))),
            }),
        )
            .into_response()
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: "invalid_json".into(),
                error_description:
                    "The passed request body contained malformed or unreadable JSON.".into(),
                extra_info: Some(ExtraInfo::Message(self.parse_problem)),
            }),
        )
            .into_response()
    }
}

/// Wrapper for [axum::extract::Path]. Identifiers that don't parse can't name a record,
/// so they are reported as not found.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PathErrorResponse))]
pub struct Path<T>(pub T);

/// Response type for path parameters that couldn't be parsed
pub struct PathErrorResponse;

impl From<PathRejection> for PathErrorResponse {
    fn from(_value: PathRejection) -> Self {
        PathErrorResponse
    }
}

impl IntoResponse for PathErrorResponse {
    fn into_response(self) -> Response {
        not_found()
    }
}

/// Successful mutation which sends the client on to a follow-up view with "303 See Other".
/// May carry a JSON body, such as the ID of a created record.
#[derive(Debug)]
pub struct FollowUp<T = ()> {
    pub location: String,
    pub body: Option<T>,
}

impl FollowUp {
    pub fn to(route: Route) -> Self {
        FollowUp {
            location: route.path(),
            body: None,
        }
    }
}

impl<T: Serialize> FollowUp<T> {
    pub fn with_body(route: Route, body: T) -> Self {
        FollowUp {
            location: route.path(),
            body: Some(body),
        }
    }
}

impl<T: Serialize> IntoResponse for FollowUp<T> {
    fn into_response(self) -> Response {
        let headers = [(header::LOCATION, self.location)];
        match self.body {
            Some(body) => (StatusCode::SEE_OTHER, headers, axum::Json(body)).into_response(),
            None => (StatusCode::SEE_OTHER, headers).into_response(),
        }
    }
}
