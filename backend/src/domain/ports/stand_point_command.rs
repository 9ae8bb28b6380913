//! Driving port for creating drive stand points.

use async_trait::async_trait;

use crate::domain::{Error, NewStandPoint, StandPoint};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StandPointCommand: Send + Sync {
    /// Bulk-create stand points selected by the authority.
    async fn create_stand_points(&self, points: Vec<NewStandPoint>)
    -> Result<Vec<StandPoint>, Error>;
}
