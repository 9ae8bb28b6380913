//! In-memory implementation of the stand point and user repositories.
//!
//! Proximity uses the haversine great-circle distance in metres, the same
//! spherical model the PostGIS adapter queries with.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use geo::{HaversineDistance, Point};
use mockable::Clock;

use crate::domain::ports::{
    StandPointRepository, StandPointRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Geometry, NearbyUser, NewStandPoint, NewUser, StandPoint, StandPointId, User, UserId,
};

#[derive(Default)]
struct StoreState {
    stand_points: Vec<StandPoint>,
    users: HashMap<UserId, User>,
}

/// Shared in-memory store. Clones share state.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    /// Insert or replace a user verbatim. Used to seed registration state
    /// that no endpoint writes.
    pub fn put_user(&self, user: User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        state.users.insert(*user.id(), user);
        Ok(())
    }

    /// Snapshot of every stored stand point, in insertion order.
    pub fn stand_points(&self) -> Result<Vec<StandPoint>, StandPointRepositoryError> {
        let state = self.lock().map_err(StandPointRepositoryError::query)?;
        Ok(state.stand_points.clone())
    }
}

fn to_point(geometry: &Geometry) -> Point<f64> {
    Point::new(geometry.longitude(), geometry.latitude())
}

#[async_trait]
impl StandPointRepository for InMemoryStore {
    async fn insert_many(
        &self,
        points: &[NewStandPoint],
    ) -> Result<Vec<StandPoint>, StandPointRepositoryError> {
        let now = self.clock.utc();
        let created: Vec<StandPoint> = points
            .iter()
            .cloned()
            .map(|point| point.into_stored(StandPointId::random(), now))
            .collect();
        let mut state = self.lock().map_err(StandPointRepositoryError::query)?;
        state.stand_points.extend(created.iter().cloned());
        Ok(created)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state
            .users
            .values()
            .any(|existing| existing.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate(user.email()));
        }
        let stored = user.clone().into_stored(UserId::random(), self.clock.utc());
        state.users.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_within_radius(
        &self,
        origin: &Geometry,
        max_distance_meters: f64,
    ) -> Result<Vec<NearbyUser>, UserPersistenceError> {
        let origin = to_point(origin);
        let state = self.lock().map_err(UserPersistenceError::query)?;
        let mut nearby: Vec<NearbyUser> = state
            .users
            .values()
            .filter_map(|user| {
                let distance = origin.haversine_distance(&to_point(user.location()));
                (distance <= max_distance_meters).then(|| NearbyUser::new(user.clone(), distance))
            })
            .collect();
        nearby.sort_by(|a, b| {
            a.dist
                .calculated
                .total_cmp(&b.dist.calculated)
                .then_with(|| a.user.id().cmp(b.user.id()))
        });
        Ok(nearby)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        match state.users.get_mut(user.id()) {
            Some(slot) => {
                *slot = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_registered_for_stand_point(
        &self,
        stand_point: &StandPointId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        let mut registered: Vec<User> = state
            .users
            .values()
            .filter(|user| user.is_registered() && user.stand_point_assigned() == Some(stand_point))
            .cloned()
            .collect();
        registered.sort_by_key(User::created_at);
        Ok(registered)
    }
}
