//! Driving port for launching a vaccination drive.

use async_trait::async_trait;

use crate::domain::{DriveAssignmentHandle, Error, Geometry, NearbyUser, StandPointId};

/// Candidate stand point submitted for a drive.
///
/// Candidates without an id still take part in the proximity search but
/// contribute no reference to matched users.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveStandPoint {
    pub id: Option<StandPointId>,
    pub geometry: Geometry,
}

/// Ordered candidate list; the first entry is the proximity origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDriveRequest {
    pub stand_points: Vec<DriveStandPoint>,
}

/// Matched users as returned by the proximity query, plus a handle on the
/// background assignment batch.
#[derive(Debug)]
pub struct CreateDriveResponse {
    pub matched_users: Vec<NearbyUser>,
    pub assignment: DriveAssignmentHandle,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriveCommand: Send + Sync {
    async fn create_drive(&self, request: CreateDriveRequest)
    -> Result<CreateDriveResponse, Error>;
}
