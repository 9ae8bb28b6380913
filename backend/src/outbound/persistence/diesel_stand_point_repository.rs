//! PostgreSQL-backed stand point repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StandPointRepository, StandPointRepositoryError};
use crate::domain::{NewStandPoint, StandPoint};

use super::diesel_helpers::{DieselFailure, classify_diesel_error};
use super::models::{NewStandPointRow, StandPointRow};
use super::pool::DbPool;
use super::schema::stand_points;

fn map_diesel_error(error: diesel::result::Error) -> StandPointRepositoryError {
    match classify_diesel_error(error, "insert stand points") {
        DieselFailure::Connection(message) => StandPointRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint } => StandPointRepositoryError::query(
            format!("duplicate stand point ({})", constraint.unwrap_or_default()),
        ),
        DieselFailure::Query(message) => StandPointRepositoryError::query(message),
    }
}

#[derive(Clone)]
pub struct DieselStandPointRepository {
    pool: DbPool,
}

impl DieselStandPointRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StandPointRepository for DieselStandPointRepository {
    async fn insert_many(
        &self,
        points: &[NewStandPoint],
    ) -> Result<Vec<StandPoint>, StandPointRepositoryError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let rows = points
            .iter()
            .map(NewStandPointRow::try_from_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StandPointRepositoryError::query(err.to_string()))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| StandPointRepositoryError::connection(err.into_message()))?;

        // One multi-row INSERT, so the batch is stored atomically.
        let inserted: Vec<StandPointRow> = diesel::insert_into(stand_points::table)
            .values(&rows)
            .returning(StandPointRow::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let stored = order_like(&rows, inserted);

        stored
            .into_iter()
            .map(StandPoint::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StandPointRepositoryError::query(err.to_string()))
    }
}

/// PostgreSQL does not promise `RETURNING` order, so restore input order by id.
fn order_like(
    requested: &[NewStandPointRow<'_>],
    mut inserted: Vec<StandPointRow>,
) -> Vec<StandPointRow> {
    inserted.sort_by_key(|row| {
        requested
            .iter()
            .position(|candidate| candidate.id == row.id)
            .unwrap_or(usize::MAX)
    });
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Geometry;
    use crate::domain::test_fixtures::fixed_instant;

    fn row_for(request: &NewStandPointRow<'_>) -> StandPointRow {
        StandPointRow {
            id: request.id,
            name: request.name.to_owned(),
            location: request.location.to_owned(),
            geometry_type: request.geometry_type.to_owned(),
            longitude: request.longitude,
            latitude: request.latitude,
            number_of_user: request.number_of_user,
            left_users: request.left_users,
            created_at: fixed_instant(),
            updated_at: fixed_instant(),
        }
    }

    #[test]
    fn order_like_restores_request_order() {
        let points: Vec<NewStandPoint> = ["A", "B", "C"]
            .into_iter()
            .map(|name| NewStandPoint::new(name, "", Geometry::point(80.7, 22.3)))
            .collect();
        let rows: Vec<_> = points
            .iter()
            .map(NewStandPointRow::try_from_domain)
            .collect::<Result<_, _>>()
            .expect("in range");
        let shuffled = vec![row_for(&rows[2]), row_for(&rows[0]), row_for(&rows[1])];

        let names: Vec<String> = order_like(&rows, shuffled)
            .into_iter()
            .map(|row| row.name)
            .collect();

        assert_eq!(names, ["A", "B", "C"]);
    }
}
