//! Driven port for citizen user persistence and proximity lookups.

use async_trait::async_trait;

use crate::domain::{Geometry, NearbyUser, NewUser, StandPointId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A user with the same email is already stored.
        Duplicate { email: String } => "a user with email {email} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return the stored record.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Users whose location lies within `max_distance_meters` of `origin` on
    /// the sphere, nearest first, each with its distance. No result limit.
    async fn find_within_radius(
        &self,
        origin: &Geometry,
        max_distance_meters: f64,
    ) -> Result<Vec<NearbyUser>, UserPersistenceError>;

    /// Persist every mutable field of an existing user. Returns
    /// `Ok(false)` when no row with that id exists.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Registered users whose assigned stand point is `stand_point`.
    async fn find_registered_for_stand_point(
        &self,
        stand_point: &StandPointId,
    ) -> Result<Vec<User>, UserPersistenceError>;
}
