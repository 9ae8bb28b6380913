//! Drive handlers: launch a drive and read back registered users.
//!
//! ```text
//! POST /api/v1/drives {"driveStandPoints":[{"_id":"…","geometry":{"coordinates":[80.7,22.3]}}]}
//! GET /api/v1/drives/{id}/registered-users
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{CreateDriveRequest, DriveStandPoint};
use crate::domain::{Error, Geometry, NearbyUser, StandPointId, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_indexed_id};

const DRIVE_STAND_POINTS: FieldName = FieldName::new("driveStandPoints");
const STAND_POINT_ID: FieldName = FieldName::new("id");

/// Candidate stand point. Unknown fields (name, capacity, ...) are ignored.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DriveStandPointBody {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Option<String>,
    pub geometry: Geometry,
}

/// Request body for `POST /api/v1/drives`. The first entry seeds the
/// proximity search.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriveBody {
    #[serde(default)]
    pub drive_stand_points: Vec<DriveStandPointBody>,
}

impl TryFrom<CreateDriveBody> for CreateDriveRequest {
    type Error = Error;

    fn try_from(value: CreateDriveBody) -> Result<Self, Self::Error> {
        let stand_points = value
            .drive_stand_points
            .into_iter()
            .enumerate()
            .map(|(index, point)| {
                let id = point
                    .id
                    .as_deref()
                    .map(|raw| parse_indexed_id(raw, DRIVE_STAND_POINTS, index))
                    .transpose()?;
                Ok(DriveStandPoint {
                    id,
                    geometry: point.geometry,
                })
            })
            .collect::<Result<_, Error>>()?;
        Ok(Self { stand_points })
    }
}

/// Match users within 3 km of the first candidate and start assigning every
/// candidate to them. Responds before the assignment batch settles.
#[utoipa::path(
    post,
    path = "/api/v1/drives",
    request_body = CreateDriveBody,
    responses(
        (status = 200, description = "Users matched by the proximity search", body = [NearbyUser]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No drive points, or no users within range", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["drives"],
    operation_id = "createDrive"
)]
#[post("/drives")]
pub async fn create_drive(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDriveBody>,
) -> ApiResult<web::Json<Vec<NearbyUser>>> {
    session.require_authority()?;
    let request = CreateDriveRequest::try_from(payload.into_inner())?;
    let response = state.drives.create_drive(request).await?;
    debug!(
        matched = response.matched_users.len(),
        settled = response.assignment.is_finished(),
        "drive accepted; assignment continues in background"
    );
    Ok(web::Json(response.matched_users))
}

/// Registered users assigned to a stand point.
#[utoipa::path(
    get,
    path = "/api/v1/drives/{id}/registered-users",
    params(("id" = String, Path, description = "Stand point id")),
    responses(
        (status = 200, description = "Registered users", body = [User]),
        (status = 400, description = "Invalid stand point id", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["drives"],
    operation_id = "listRegisteredUsers"
)]
#[get("/drives/{id}/registered-users")]
pub async fn registered_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require_authority()?;
    let stand_point: StandPointId = parse_id(&path.into_inner(), STAND_POINT_ID)?;
    let users = state.registered_users.registered_users(&stand_point).await?;
    Ok(web::Json(users))
}

#[cfg(test)]
#[path = "drives_tests.rs"]
mod tests;
