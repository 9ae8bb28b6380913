//! Shared builders for domain unit tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{Geometry, NewUser, StandPointId, User, UserDraft, UserId};

/// Clock frozen at a fixed instant.
pub(crate) struct FixtureClock(pub DateTime<Utc>);

impl Default for FixtureClock {
    fn default() -> Self {
        Self(fixed_instant())
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 1, 9, 0, 0)
        .single()
        .expect("valid fixture instant")
}

/// Unregistered user stored at `(longitude, latitude)`.
pub(crate) fn user_at(longitude: f64, latitude: f64) -> User {
    NewUser::try_new(
        "Fixture Citizen",
        &format!("citizen-{}@example.org", UserId::random()),
        None,
        Geometry::point(longitude, latitude),
    )
    .expect("fixture user is valid")
    .into_stored(UserId::random(), fixed_instant())
}

/// User registered at `stand_point`.
pub(crate) fn registered_user(stand_point: StandPointId) -> User {
    let mut draft = UserDraft::from(user_at(80.7, 22.3));
    draft.is_registered = true;
    draft.stand_point_assigned = Some(stand_point);
    User::from(draft)
}
