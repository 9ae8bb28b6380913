//! Stand point (vaccination location) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Geometry, StandPointId};

/// Capacity recorded when a descriptor omits `numberOfUser`.
pub const DEFAULT_NUMBER_OF_USER: u32 = 30;

/// Descriptor for a stand point that has not been stored yet.
///
/// No geographic bounds or duplicate checks are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStandPoint {
    pub name: String,
    pub location: String,
    pub geometry: Geometry,
    pub number_of_user: u32,
    pub left_users: Option<u32>,
}

impl NewStandPoint {
    /// Build a descriptor with the default capacity and no remaining-capacity counter.
    ///
    /// # Examples
    /// ```
    /// use vaxdrive::domain::{Geometry, NewStandPoint, DEFAULT_NUMBER_OF_USER};
    ///
    /// let point = NewStandPoint::new("Ward 4", "Community hall", Geometry::point(80.7, 22.3));
    /// assert_eq!(point.number_of_user, DEFAULT_NUMBER_OF_USER);
    /// assert!(point.left_users.is_none());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            geometry,
            number_of_user: DEFAULT_NUMBER_OF_USER,
            left_users: None,
        }
    }

    /// Attach a store-assigned identifier and timestamps.
    #[must_use]
    pub fn into_stored(self, id: StandPointId, created_at: DateTime<Utc>) -> StandPoint {
        StandPoint {
            id,
            name: self.name,
            location: self.location,
            geometry: self.geometry,
            number_of_user: self.number_of_user,
            left_users: self.left_users,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Stored stand point.
///
/// Capacity fields are recorded but not enforced by drive matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandPoint {
    #[schema(value_type = String, format = Uuid)]
    pub id: StandPointId,
    #[schema(example = "Ward 4")]
    pub name: String,
    #[schema(example = "Community hall, Station Road")]
    pub location: String,
    pub geometry: Geometry,
    #[schema(example = 30)]
    pub number_of_user: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_users: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
