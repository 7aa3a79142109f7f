//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("database password is hunter2").with_trace_id(TRACE_ID)
}

async fn body_of(error: &Error) -> (StatusCode, Option<String>, ErrorBody) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body deserialises");
    (status, header, body)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error: Error) {
    let (status, header, body) = body_of(&internal_error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body.error, "Internal server error");
    assert_eq!(body.trace_id.as_deref(), Some(TRACE_ID));
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_their_message() {
    let error = Error::not_found("case not found").with_trace_id(TRACE_ID);
    let (status, _, body) = body_of(&error).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        ErrorBody {
            error: "case not found".to_owned(),
            trace_id: Some(TRACE_ID.to_owned()),
        }
    );
}

#[rstest]
#[actix_web::test]
async fn trace_id_is_omitted_outside_a_request() {
    let (_, header, body) = body_of(&Error::forbidden("denied")).await;
    assert!(header.is_none());
    assert!(body.trace_id.is_none());
    let json = serde_json::to_value(&body).expect("serialise");
    assert!(json.get("trace_id").is_none());
}
