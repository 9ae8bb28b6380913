//! PostgreSQL/PostGIS-backed user repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Double;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Geometry, NearbyUser, NewUser, StandPointId, User, UserId};

use super::diesel_helpers::{DieselFailure, classify_diesel_error};
use super::models::{NearbyUserRow, NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Users within `$3` metres of `($1, $2)` on the sphere, nearest first.
///
/// `use_spheroid` is off so distances agree with the in-memory haversine.
const WITHIN_RADIUS_SQL: &str = r"
SELECT
    id, name, email, mobile_number, geometry_type, longitude, latitude,
    is_registered, stand_point_assigned, map_view_stand_points, is_vaccinated,
    created_at, updated_at,
    ST_Distance(geom, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, false) AS distance_meters
FROM users
WHERE ST_DWithin(geom, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $3, false)
ORDER BY distance_meters ASC, id ASC
";

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> UserPersistenceError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation { constraint } => {
            UserPersistenceError::query(format!(
                "{operation}: unique constraint {} violated",
                constraint.unwrap_or_default()
            ))
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err, "insert user") {
                DieselFailure::UniqueViolation { .. } => {
                    UserPersistenceError::duplicate(user.email())
                }
                DieselFailure::Connection(message) => UserPersistenceError::connection(message),
                DieselFailure::Query(message) => UserPersistenceError::query(message),
            })?;
        Ok(User::from(row))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find user"))?;
        Ok(row.map(User::from))
    }

    async fn find_within_radius(
        &self,
        origin: &Geometry,
        max_distance_meters: f64,
    ) -> Result<Vec<NearbyUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NearbyUserRow> = sql_query(WITHIN_RADIUS_SQL)
            .bind::<Double, _>(origin.longitude())
            .bind::<Double, _>(origin.latitude())
            .bind::<Double, _>(max_distance_meters)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "find users within radius"))?;
        Ok(rows.into_iter().map(NearbyUser::from).collect())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(*user.id().as_uuid()))
            .set(UserChangeset::from(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update user"))?;
        Ok(updated > 0)
    }

    async fn find_registered_for_stand_point(
        &self,
        stand_point: &StandPointId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target: Uuid = (*stand_point).into();
        let rows: Vec<UserRow> = users::table
            .filter(users::is_registered.eq(true))
            .filter(users::stand_point_assigned.eq(target))
            .order_by(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "find registered users"))?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
