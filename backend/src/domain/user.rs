//! Citizen user model and proximity results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Geometry, StandPointId, UserId};

/// Validation errors returned by [`NewUser::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Validated sign-up payload for a citizen who has not been stored yet.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `email` is trimmed, lower-cased, and contains a single `@` separating
///   non-empty parts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    name: String,
    email: String,
    mobile_number: Option<String>,
    location: Geometry,
}

impl NewUser {
    /// Validate raw sign-up fields.
    ///
    /// # Examples
    /// ```
    /// use vaxdrive::domain::{Geometry, NewUser};
    ///
    /// let user = NewUser::try_new(" Asha ", "Asha@Example.org", None, Geometry::point(80.7, 22.3))
    ///     .expect("valid sign-up");
    /// assert_eq!(user.name(), "Asha");
    /// assert_eq!(user.email(), "asha@example.org");
    /// ```
    pub fn try_new(
        name: &str,
        email: &str,
        mobile_number: Option<String>,
        location: Geometry,
    ) -> Result<Self, UserValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        let email = email.trim().to_lowercase();
        if !looks_like_email(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            mobile_number: mobile_number
                .map(|number| number.trim().to_owned())
                .filter(|number| !number.is_empty()),
            location,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn mobile_number(&self) -> Option<&str> {
        self.mobile_number.as_deref()
    }

    pub fn location(&self) -> &Geometry {
        &self.location
    }

    /// Attach a store-assigned identifier; the user starts unregistered,
    /// unvaccinated, and without stand point references.
    #[must_use]
    pub fn into_stored(self, id: UserId, created_at: DateTime<Utc>) -> User {
        User::from(UserDraft {
            id,
            name: self.name,
            email: self.email,
            mobile_number: self.mobile_number,
            location: self.location,
            is_registered: false,
            stand_point_assigned: None,
            map_view_stand_points: Vec::new(),
            is_vaccinated: false,
            created_at,
            updated_at: created_at,
        })
    }
}

fn looks_like_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    match candidate.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Field bag used by adapters to rebuild a [`User`] from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile_number: Option<String>,
    pub location: Geometry,
    pub is_registered: bool,
    pub stand_point_assigned: Option<StandPointId>,
    pub map_view_stand_points: Vec<StandPointId>,
    pub is_vaccinated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored citizen user.
///
/// ## Invariants
/// - `map_view_stand_points` keeps insertion order and may hold duplicates;
///   drive matching only ever appends to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, format = Uuid)]
    id: UserId,
    #[schema(example = "Asha Verma")]
    name: String,
    #[schema(example = "asha@example.org")]
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mobile_number: Option<String>,
    location: Geometry,
    is_registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Uuid)]
    stand_point_assigned: Option<StandPointId>,
    #[schema(value_type = Vec<String>)]
    map_view_stand_points: Vec<StandPointId>,
    is_vaccinated: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserDraft> for User {
    fn from(draft: UserDraft) -> Self {
        Self {
            id: draft.id,
            name: draft.name,
            email: draft.email,
            mobile_number: draft.mobile_number,
            location: draft.location,
            is_registered: draft.is_registered,
            stand_point_assigned: draft.stand_point_assigned,
            map_view_stand_points: draft.map_view_stand_points,
            is_vaccinated: draft.is_vaccinated,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        }
    }
}

impl From<User> for UserDraft {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile_number: user.mobile_number,
            location: user.location,
            is_registered: user.is_registered,
            stand_point_assigned: user.stand_point_assigned,
            map_view_stand_points: user.map_view_stand_points,
            is_vaccinated: user.is_vaccinated,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl User {
    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn mobile_number(&self) -> Option<&str> {
        self.mobile_number.as_deref()
    }

    pub fn location(&self) -> &Geometry {
        &self.location
    }

    pub fn is_registered(&self) -> bool {
        self.is_registered
    }

    pub fn stand_point_assigned(&self) -> Option<&StandPointId> {
        self.stand_point_assigned.as_ref()
    }

    /// Stand points attached by drives, oldest first.
    pub fn map_view_stand_points(&self) -> &[StandPointId] {
        &self.map_view_stand_points
    }

    pub fn is_vaccinated(&self) -> bool {
        self.is_vaccinated
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Append every id in order. Existing references are kept, so repeated
    /// drives produce duplicates.
    pub fn attach_stand_points(&mut self, ids: &[StandPointId]) {
        self.map_view_stand_points.extend_from_slice(ids);
    }

    /// Record the modification time of a pending update.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Distance computed by a proximity query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Distance {
    /// Great-circle distance from the query origin in metres.
    #[schema(example = 1250.4)]
    pub calculated: f64,
}

/// User matched by a proximity query together with its distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NearbyUser {
    #[serde(flatten)]
    pub user: User,
    pub dist: Distance,
}

impl NearbyUser {
    #[must_use]
    pub fn new(user: User, distance_meters: f64) -> Self {
        Self {
            user,
            dist: Distance {
                calculated: distance_meters,
            },
        }
    }
}
