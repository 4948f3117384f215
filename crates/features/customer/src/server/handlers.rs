use crate::Customers;
use crate::error::CustomerError;
use crate::model::{Customer, CustomerDto, CustomerPayload};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use chub_derive::api_handler;
use chub_domain::constants::CUSTOMER_TAG;
use chub_kernel::matrix::MatrixSegment;
use chub_kernel::server::{ApiState, ErrorBody};
use tracing::{debug, info};
use validator::Validate;

const EMAIL_KEY: &str = "email";

fn customers(state: &ApiState) -> Result<&Customers, CustomerError> {
    Ok(state.try_get_slice::<Customers>()?)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/json")
                || mime.to_ascii_lowercase().ends_with("+json")
        })
}

/// Creates a customer from a JSON body.
#[api_handler(
    post,
    path = "/customers/create",
    request_body = CustomerPayload,
    responses(
        (status = CREATED, description = "Customer stored", body = String, content_type = "text/plain"),
        (status = NO_CONTENT, description = "Request carried no body"),
        (status = BAD_REQUEST, description = "Malformed JSON", body = ErrorBody),
        (status = CONFLICT, description = "Id or email already stored", body = ErrorBody),
        (status = UNSUPPORTED_MEDIA_TYPE, description = "Body is not JSON", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Field validation failed", body = ErrorBody),
    ),
    tag = CUSTOMER_TAG,
)]
pub(super) async fn create_customer(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, CustomerError> {
    if body.is_empty() {
        debug!("Create request without body: check data fields");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    if !is_json(&headers) {
        return Err(CustomerError::UnsupportedMediaType {
            message: "Expected request with `Content-Type: application/json`".into(),
            context: None,
        });
    }

    let Json(payload) = Json::<CustomerPayload>::from_bytes(&body).map_err(|rejection| {
        CustomerError::BadRequest { message: rejection.body_text().into(), context: None }
    })?;
    payload.validate()?;
    let customer = Customer::try_from(payload)?;

    let saved = customers(&state)?.service.save_customer(customer).await?;
    Ok((StatusCode::CREATED, format!("Data created for : {}", saved.name)).into_response())
}

/// Lists every stored customer ordered by id.
#[api_handler(
    get,
    path = "/customers/get",
    responses(
        (status = OK, description = "Stored customers", body = Vec<CustomerDto>),
        (status = NOT_FOUND, description = "No customers stored", body = ErrorBody),
    ),
    tag = CUSTOMER_TAG,
)]
pub(super) async fn get_customers(
    State(state): State<ApiState>,
) -> Result<Json<Vec<CustomerDto>>, CustomerError> {
    let service = &customers(&state)?.service;
    let all = service.get_all_customers().await?;
    if all.is_empty() {
        return Err(service.no_data());
    }
    Ok(Json(all))
}

#[api_handler(
    get,
    path = "/customers/get/{customer_id}",
    params(("customer_id" = i32, Path, description = "Customer identifier")),
    responses(
        (status = OK, description = "Customer found", body = CustomerDto),
        (status = BAD_REQUEST, description = "Identifier is not an integer", body = ErrorBody),
        (status = NOT_FOUND, description = "Customer does not exist", body = ErrorBody),
    ),
    tag = CUSTOMER_TAG,
)]
pub(super) async fn get_customer_by_id(
    State(state): State<ApiState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerDto>, CustomerError> {
    let id = customer_id.trim().parse::<i32>().map_err(|_| CustomerError::BadRequest {
        message: format!("Invalid customer id '{customer_id}'").into(),
        context: None,
    })?;

    info!(customer_id = id, "Customer lookup");
    let service = &customers(&state)?.service;
    service.get_customer_by_id(id).await?.map(Json).ok_or_else(|| service.not_found(id))
}

/// Looks up customers by email.
///
/// The segment may carry `email` matrix variables (`x;email=a@x.io;email=b@x.io` or
/// `x;email=a@x.io,b@x.io`); results follow their order. Without them the segment
/// itself is the email. Values are percent-decoded after splitting, so encoded `;` and
/// `,` belong to the value.
#[api_handler(
    get,
    path = "/customers/get-emails/{email}",
    params(("email" = String, Path, description = "Email, or a segment with `email` matrix variables")),
    responses(
        (status = OK, description = "Customers in request order", body = Vec<CustomerDto>),
        (status = NOT_FOUND, description = "An email has no customer", body = ErrorBody),
    ),
    tag = CUSTOMER_TAG,
)]
pub(super) async fn get_customers_by_emails(
    State(state): State<ApiState>,
    uri: Uri,
) -> Result<Json<Vec<CustomerDto>>, CustomerError> {
    let raw = uri.path().rsplit('/').next().unwrap_or_default();
    let segment = MatrixSegment::parse(raw);
    let emails: Vec<&str> = match segment.get(EMAIL_KEY) {
        Some(values) if !values.is_empty() => values.iter().map(String::as_str).collect(),
        _ if !segment.value().is_empty() => vec![segment.value()],
        _ => Vec::new(),
    };
    debug!(count = emails.len(), "Looking up customers by email");

    let found = customers(&state)?.service.get_customers_by_emails(&emails).await?;
    Ok(Json(found))
}
