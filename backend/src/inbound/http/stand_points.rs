//! Stand point creation handler.
//!
//! ```text
//! POST /api/v1/standpoints {"selectedPoints":[{"name":"Ward 4","geometry":{"coordinates":[80.7,22.3]}}]}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DEFAULT_NUMBER_OF_USER, Error, Geometry, NewStandPoint, StandPoint};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, check_indexed_count};

const NUMBER_OF_USER_FIELD: FieldName = FieldName::new("numberOfUser");
const LEFT_USERS_FIELD: FieldName = FieldName::new("leftUsers");

/// One selected location. Missing text fields are stored as empty strings.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandPointDescriptor {
    #[serde(default)]
    #[schema(example = "Ward 4")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Community hall, Station Road")]
    pub location: String,
    pub geometry: Geometry,
    #[serde(default)]
    #[schema(example = 30)]
    pub number_of_user: Option<u32>,
    #[serde(default)]
    pub left_users: Option<u32>,
}

impl StandPointDescriptor {
    /// Convert element `index` of `selectedPoints`, rejecting capacities the
    /// store cannot hold.
    fn into_new_stand_point(self, index: usize) -> Result<NewStandPoint, Error> {
        let number_of_user = check_indexed_count(
            self.number_of_user.unwrap_or(DEFAULT_NUMBER_OF_USER),
            NUMBER_OF_USER_FIELD,
            index,
        )?;
        let left_users = self
            .left_users
            .map(|left| check_indexed_count(left, LEFT_USERS_FIELD, index))
            .transpose()?;
        let mut point = NewStandPoint::new(self.name, self.location, self.geometry);
        point.number_of_user = number_of_user;
        point.left_users = left_users;
        Ok(point)
    }
}

/// Request body for `POST /api/v1/standpoints`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStandPointsRequest {
    #[serde(default)]
    pub selected_points: Vec<StandPointDescriptor>,
}

/// Bulk-create the stand points selected for a drive.
#[utoipa::path(
    post,
    path = "/api/v1/standpoints",
    request_body = CreateStandPointsRequest,
    responses(
        (status = 201, description = "Created stand points", body = [StandPoint]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Unable to create standpoints", body = Error)
    ),
    tags = ["standpoints"],
    operation_id = "createStandPoints"
)]
#[post("/standpoints")]
pub async fn create_stand_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateStandPointsRequest>,
) -> ApiResult<HttpResponse> {
    session.require_authority()?;
    let points = payload
        .into_inner()
        .selected_points
        .into_iter()
        .enumerate()
        .map(|(index, point)| point.into_new_stand_point(index))
        .collect::<Result<Vec<_>, _>>()?;
    let created = state.stand_points.create_stand_points(points).await?;
    Ok(HttpResponse::Created().json(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::StandPointId;
    use crate::inbound::http::test_utils::{MockPorts, login_request, session_cookie, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(create_stand_points);
    }

    fn store(points: Vec<NewStandPoint>) -> Vec<StandPoint> {
        let at = Utc
            .with_ymd_and_hms(2021, 6, 1, 9, 0, 0)
            .single()
            .expect("fixture instant");
        points
            .into_iter()
            .map(|point| point.into_stored(StandPointId::random(), at))
            .collect()
    }

    async fn post_authenticated(ports: MockPorts, body: Value) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let login = test::call_service(&app, login_request().to_request()).await;
        let cookie = session_cookie(&login);
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/standpoints")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await
    }

    fn point(name: &str, lon: f64, lat: f64) -> Value {
        json!({ "name": name, "location": "hall", "geometry": { "coordinates": [lon, lat] } })
    }

    #[rstest]
    #[actix_web::test]
    async fn creates_every_selected_point() {
        let mut ports = MockPorts::default();
        ports
            .stand_points
            .expect_create_stand_points()
            .withf(|points| {
                points.len() == 4
                    && points.iter().all(|p| p.number_of_user == DEFAULT_NUMBER_OF_USER)
                    && points[3].left_users == Some(5)
            })
            .times(1)
            .returning(|points| Ok(store(points)));

        let mut last = point("D", 80.9, 22.6);
        last["leftUsers"] = json!(5);
        let res = post_authenticated(
            ports,
            json!({ "selectedPoints": [
                point("A", 80.7, 22.3),
                point("B", 80.8, 22.4),
                point("C", 80.6, 22.5),
                last,
            ]}),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Vec<Value> = test::read_body_json(res).await;
        assert_eq!(body.len(), 4);
        assert!(body.iter().all(|record| record["id"].is_string()));
        assert_eq!(body[0]["numberOfUser"], 30);
        assert_eq!(body[0]["geometry"]["type"], "Point");
    }

    #[rstest]
    #[actix_web::test]
    async fn store_failure_is_redacted_500() {
        let mut ports = MockPorts::default();
        ports
            .stand_points
            .expect_create_stand_points()
            .return_once(|_| Err(Error::internal("Unable to create standpoints")));

        let res = post_authenticated(ports, json!({ "selectedPoints": [point("A", 80.7, 22.3)] }))
            .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "internal_error");
        assert_eq!(body["message"], "Internal server error");
        assert!(body["traceId"].is_string());
    }

    #[rstest]
    #[case::one_coordinate(json!({ "selectedPoints": [{ "geometry": { "coordinates": [80.7] } }] }))]
    #[case::text_coordinates(json!({ "selectedPoints": [{ "geometry": { "coordinates": ["80.7", "22.3"] } }] }))]
    #[case::negative_capacity(json!({ "selectedPoints": [{
        "geometry": { "coordinates": [80.7, 22.3] },
        "numberOfUser": -1
    }] }))]
    #[case::missing_geometry(json!({ "selectedPoints": [{ "name": "A" }] }))]
    #[actix_web::test]
    async fn malformed_descriptors_are_rejected(#[case] body: Value) {
        let mut ports = MockPorts::default();
        ports.stand_points.expect_create_stand_points().times(0);

        let res = post_authenticated(ports, body).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[rstest]
    #[case::number_of_user("numberOfUser")]
    #[case::left_users("leftUsers")]
    #[actix_web::test]
    async fn oversized_capacity_is_rejected(#[case] field: &str) {
        let mut ports = MockPorts::default();
        ports.stand_points.expect_create_stand_points().times(0);
        let mut oversized = point("B", 80.8, 22.4);
        oversized[field] = json!(u32::MAX);

        let res = post_authenticated(
            ports,
            json!({ "selectedPoints": [point("A", 80.7, 22.3), oversized] }),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["index"], 1);
        assert_eq!(body["details"]["code"], "out_of_range");
    }

    #[rstest]
    #[actix_web::test]
    async fn requires_login() {
        let mut ports = MockPorts::default();
        ports.stand_points.expect_create_stand_points().times(0);
        let app = test::init_service(test_app(ports.into_state(), routes)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/standpoints")
                .set_json(json!({ "selectedPoints": [] }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
