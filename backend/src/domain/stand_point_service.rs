//! Stand point creation service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{StandPointCommand, StandPointRepository};
use crate::domain::{Error, NewStandPoint, StandPoint};

pub(crate) const CREATE_FAILED: &str = "Unable to create standpoints";

/// Implements [`StandPointCommand`] over a [`StandPointRepository`].
#[derive(Clone)]
pub struct StandPointService<R> {
    repo: Arc<R>,
}

impl<R> StandPointService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> StandPointCommand for StandPointService<R>
where
    R: StandPointRepository,
{
    async fn create_stand_points(
        &self,
        points: Vec<NewStandPoint>,
    ) -> Result<Vec<StandPoint>, Error> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let created = self.repo.insert_many(&points).await.map_err(|err| {
            error!(error = %err, requested = points.len(), "stand point insert failed");
            Error::internal(CREATE_FAILED)
        })?;
        info!(created = created.len(), "stand points created");
        Ok(created)
    }
}
