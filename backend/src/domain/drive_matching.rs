//! Drive matching: find citizens near a drive and hand them to the
//! assignment worker.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateDriveRequest, CreateDriveResponse, DriveCommand, UserPersistenceError, UserRepository,
};
use crate::domain::{DriveAssignmentWorker, Error};

/// Proximity radius, in metres on the sphere, around the first candidate.
pub const DRIVE_MATCH_RADIUS_METERS: f64 = 3000.0;

pub(crate) const NO_DRIVE_POINTS: &str = "No drive points found";
pub(crate) const NO_USERS_IN_RANGE: &str = "No users within range of drive points found";

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

/// Implements [`DriveCommand`].
///
/// Only the first candidate's coordinates seed the proximity search, while
/// every candidate id is attached to each matched user.
#[derive(Clone)]
pub struct DriveMatchingService {
    users: Arc<dyn UserRepository>,
    worker: DriveAssignmentWorker,
}

impl DriveMatchingService {
    pub fn new(users: Arc<dyn UserRepository>, worker: DriveAssignmentWorker) -> Self {
        Self { users, worker }
    }
}

#[async_trait]
impl DriveCommand for DriveMatchingService {
    async fn create_drive(
        &self,
        request: CreateDriveRequest,
    ) -> Result<CreateDriveResponse, Error> {
        let Some(origin) = request.stand_points.first().map(|point| point.geometry.clone()) else {
            return Err(Error::not_found(NO_DRIVE_POINTS));
        };
        let candidates = request.stand_points.len();
        debug!(
            candidates,
            origin = ?origin.coordinates(),
            "searching for users near drive"
        );

        let matched_users = self
            .users
            .find_within_radius(&origin, DRIVE_MATCH_RADIUS_METERS)
            .await
            .map_err(map_repository_error)?;
        if matched_users.is_empty() {
            return Err(Error::not_found(NO_USERS_IN_RANGE).with_details(json!({
                "origin": origin.coordinates(),
                "maxDistanceMeters": DRIVE_MATCH_RADIUS_METERS,
            })));
        }

        let stand_point_ids = request
            .stand_points
            .iter()
            .filter_map(|point| point.id)
            .collect();
        let user_ids = matched_users.iter().map(|nearby| *nearby.user.id()).collect();
        info!(
            matched = matched_users.len(),
            candidates,
            "drive matched users"
        );
        let assignment = self.worker.dispatch(user_ids, stand_point_ids);

        Ok(CreateDriveResponse {
            matched_users,
            assignment,
        })
    }
}

#[cfg(test)]
#[path = "drive_matching_tests.rs"]
mod tests;
