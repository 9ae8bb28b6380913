//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("No drive points found"), ErrorCode::NotFound)]
#[case(Error::conflict("duplicate"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("pool closed"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_as_camel_case_and_skips_empty_fields(expected_trace_id: String) {
    let with_trace = Error::not_found("No users within range of drive points found")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "origin": [80.7, 22.3] }));
    let value = serde_json::to_value(&with_trace).expect("serialises");
    assert_eq!(value["code"], "not_found");
    assert_eq!(value["traceId"], expected_trace_id.as_str());
    assert_eq!(value["details"]["origin"][0], 80.7);

    let bare = serde_json::to_value(Error::invalid_request("bad")).expect("serialises");
    assert!(bare.get("traceId").is_none());
    assert!(bare.get("details").is_none());
}

#[rstest]
fn deserialises_snake_case_trace_alias() {
    let error: Error = serde_json::from_value(json!({
        "code": "internal_error",
        "message": "boom",
        "trace_id": TRACE_ID,
    }))
    .expect("deserialises");
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}
