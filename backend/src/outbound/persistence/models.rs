//! Internal Diesel row structs. Never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Double;
use uuid::Uuid;

use crate::domain::{
    Geometry, NearbyUser, NewStandPoint, NewUser, StandPoint, StandPointId, User, UserDraft,
    UserId,
};

use super::schema::{stand_points, users};

/// Raised when a stored integer does not fit the domain type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column {column} holds out-of-range value {value}")]
pub(crate) struct ColumnRangeError {
    pub column: &'static str,
    pub value: i64,
}

fn to_u32(column: &'static str, value: i32) -> Result<u32, ColumnRangeError> {
    u32::try_from(value).map_err(|_| ColumnRangeError {
        column,
        value: i64::from(value),
    })
}

pub(crate) fn to_i32(column: &'static str, value: u32) -> Result<i32, ColumnRangeError> {
    i32::try_from(value).map_err(|_| ColumnRangeError {
        column,
        value: i64::from(value),
    })
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stand_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StandPointRow {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub geometry_type: String,
    pub longitude: f64,
    pub latitude: f64,
    pub number_of_user: i32,
    pub left_users: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<StandPointRow> for StandPoint {
    type Error = ColumnRangeError;

    fn try_from(row: StandPointRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: StandPointId::from(row.id),
            name: row.name,
            location: row.location,
            geometry: Geometry::with_kind(row.geometry_type, row.longitude, row.latitude),
            number_of_user: to_u32("number_of_user", row.number_of_user)?,
            left_users: row
                .left_users
                .map(|left| to_u32("left_users", left))
                .transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stand_points)]
pub(crate) struct NewStandPointRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub location: &'a str,
    pub geometry_type: &'a str,
    pub longitude: f64,
    pub latitude: f64,
    pub number_of_user: i32,
    pub left_users: Option<i32>,
}

impl<'a> NewStandPointRow<'a> {
    pub fn try_from_domain(point: &'a NewStandPoint) -> Result<Self, ColumnRangeError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: point.name.as_str(),
            location: point.location.as_str(),
            geometry_type: point.geometry.kind(),
            longitude: point.geometry.longitude(),
            latitude: point.geometry.latitude(),
            number_of_user: to_i32("number_of_user", point.number_of_user)?,
            left_users: point
                .left_users
                .map(|left| to_i32("left_users", left))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile_number: Option<String>,
    pub geometry_type: String,
    pub longitude: f64,
    pub latitude: f64,
    pub is_registered: bool,
    pub stand_point_assigned: Option<Uuid>,
    pub map_view_stand_points: Vec<Uuid>,
    pub is_vaccinated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self::from(UserDraft {
            id: UserId::from(row.id),
            name: row.name,
            email: row.email,
            mobile_number: row.mobile_number,
            location: Geometry::with_kind(row.geometry_type, row.longitude, row.latitude),
            is_registered: row.is_registered,
            stand_point_assigned: row.stand_point_assigned.map(StandPointId::from),
            map_view_stand_points: row
                .map_view_stand_points
                .into_iter()
                .map(StandPointId::from)
                .collect(),
            is_vaccinated: row.is_vaccinated,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// User row plus the distance computed by a proximity query.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct NearbyUserRow {
    #[diesel(embed)]
    pub user: UserRow,
    #[diesel(sql_type = Double)]
    pub distance_meters: f64,
}

impl From<NearbyUserRow> for NearbyUser {
    fn from(row: NearbyUserRow) -> Self {
        Self::new(User::from(row.user), row.distance_meters)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub mobile_number: Option<&'a str>,
    pub geometry_type: &'a str,
    pub longitude: f64,
    pub latitude: f64,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: user.name(),
            email: user.email(),
            mobile_number: user.mobile_number(),
            geometry_type: user.location().kind(),
            longitude: user.location().longitude(),
            latitude: user.location().latitude(),
        }
    }
}

/// Every mutable user column. `None` clears nullable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub mobile_number: Option<&'a str>,
    pub geometry_type: &'a str,
    pub longitude: f64,
    pub latitude: f64,
    pub is_registered: bool,
    pub stand_point_assigned: Option<Uuid>,
    pub map_view_stand_points: Vec<Uuid>,
    pub is_vaccinated: bool,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for UserChangeset<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: user.name(),
            email: user.email(),
            mobile_number: user.mobile_number(),
            geometry_type: user.location().kind(),
            longitude: user.location().longitude(),
            latitude: user.location().latitude(),
            is_registered: user.is_registered(),
            stand_point_assigned: user.stand_point_assigned().map(|id| *id.as_uuid()),
            map_view_stand_points: user
                .map_view_stand_points()
                .iter()
                .map(|id| *id.as_uuid())
                .collect(),
            is_vaccinated: user.is_vaccinated(),
            updated_at: user.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{fixed_instant, user_at};
    use rstest::rstest;

    fn stand_point_row(number_of_user: i32, left_users: Option<i32>) -> StandPointRow {
        StandPointRow {
            id: Uuid::new_v4(),
            name: "Ward 4".to_owned(),
            location: "Community hall".to_owned(),
            geometry_type: "Point".to_owned(),
            longitude: 80.7,
            latitude: 22.3,
            number_of_user,
            left_users,
            created_at: fixed_instant(),
            updated_at: fixed_instant(),
        }
    }

    #[rstest]
    fn stand_point_row_converts() {
        let point = StandPoint::try_from(stand_point_row(30, Some(12))).expect("in range");
        assert_eq!(point.number_of_user, 30);
        assert_eq!(point.left_users, Some(12));
        assert_eq!(point.geometry.coordinates(), [80.7, 22.3]);
    }

    #[rstest]
    #[case(-1, None, "number_of_user")]
    #[case(30, Some(-5), "left_users")]
    fn negative_counts_are_rejected(
        #[case] number_of_user: i32,
        #[case] left_users: Option<i32>,
        #[case] column: &str,
    ) {
        let err = StandPoint::try_from(stand_point_row(number_of_user, left_users))
            .expect_err("negative count");
        assert_eq!(err.column, column);
    }

    #[rstest]
    fn changeset_preserves_reference_order() {
        let mut user = user_at(80.7, 22.3);
        let ids = [StandPointId::random(), StandPointId::random()];
        user.attach_stand_points(&ids);
        user.attach_stand_points(&ids[..1]);

        let changeset = UserChangeset::from(&user);

        assert_eq!(
            changeset.map_view_stand_points,
            vec![*ids[0].as_uuid(), *ids[1].as_uuid(), *ids[0].as_uuid()]
        );
    }
}
