//! Driven port for stand point persistence.

use async_trait::async_trait;

use crate::domain::{NewStandPoint, StandPoint};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by stand point repository adapters.
    pub enum StandPointRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stand point repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "stand point repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StandPointRepository: Send + Sync {
    /// Insert every descriptor in one batch and return the stored records in
    /// input order. Either all rows are stored or none are.
    async fn insert_many(
        &self,
        points: &[NewStandPoint],
    ) -> Result<Vec<StandPoint>, StandPointRepositoryError>;
}
