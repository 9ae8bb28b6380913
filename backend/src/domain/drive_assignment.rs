//! Bounded background worker attaching drive stand points to matched users.
//!
//! Each matched user is re-fetched, has every candidate stand point appended
//! to its reference list, is persisted, and is then sent a registration
//! request. A shared semaphore caps how many users are in flight across all
//! drives. Outcomes are collected into a [`DriveAssignmentReport`] that is
//! logged when the batch settles and handed to whoever awaits the
//! [`DriveAssignmentHandle`].

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, warn};

use crate::domain::ports::{RegistrationNotifier, UserRepository};
use crate::domain::{Error, StandPointId, TraceId, UserId};

/// Users processed concurrently when no limit is configured.
pub const DEFAULT_ASSIGNMENT_CONCURRENCY: usize = 8;

/// Step at which a single user's assignment failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStage {
    /// Re-fetching the user failed or the user no longer exists.
    Lookup,
    /// Writing the updated reference list failed.
    Persist,
    /// The registration request could not be sent. The update is kept.
    Notify,
}

/// Failure recorded for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFailure {
    pub user_id: UserId,
    pub stage: AssignmentStage,
    pub message: String,
}

/// Aggregate outcome of one drive's assignment batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveAssignmentReport {
    /// Users whose reference list was persisted.
    pub assigned: usize,
    /// Users who were also sent a registration request.
    pub notified: usize,
    pub failures: Vec<AssignmentFailure>,
    /// Tasks that panicked or were cancelled before reporting.
    pub lost: usize,
}

impl DriveAssignmentReport {
    fn record(&mut self, outcome: Result<(), AssignmentFailure>) {
        match outcome {
            Ok(()) => {
                self.assigned += 1;
                self.notified += 1;
            }
            Err(failure) => {
                if failure.stage == AssignmentStage::Notify {
                    self.assigned += 1;
                }
                self.failures.push(failure);
            }
        }
    }

    /// True when every user was persisted and notified.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.lost == 0
    }

    fn log(&self) {
        if self.is_clean() {
            info!(
                assigned = self.assigned,
                notified = self.notified,
                "drive assignment settled"
            );
        } else {
            warn!(
                assigned = self.assigned,
                notified = self.notified,
                failed = self.failures.len(),
                lost = self.lost,
                "drive assignment settled with failures"
            );
        }
    }
}

/// Handle on a running assignment batch.
///
/// Dropping the handle leaves the batch running.
#[derive(Debug)]
pub struct DriveAssignmentHandle {
    task: JoinHandle<DriveAssignmentReport>,
}

impl DriveAssignmentHandle {
    /// Wrap an already known report. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn from_report(report: DriveAssignmentReport) -> Self {
        Self {
            task: tokio::spawn(async move { report }),
        }
    }

    /// True once the batch has produced its report.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for every user in the batch to settle.
    pub async fn settled(self) -> Result<DriveAssignmentReport, Error> {
        self.task
            .await
            .map_err(|err| Error::internal(format!("drive assignment batch aborted: {err}")))
    }
}

/// Background worker shared by every drive request.
#[derive(Clone)]
pub struct DriveAssignmentWorker {
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn RegistrationNotifier>,
    clock: Arc<dyn Clock>,
    permits: Arc<Semaphore>,
}

impl DriveAssignmentWorker {
    /// Build a worker processing at most `max_in_flight` users at once.
    /// A limit of zero is raised to one.
    pub fn new(
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn RegistrationNotifier>,
        clock: Arc<dyn Clock>,
        max_in_flight: usize,
    ) -> Self {
        Self {
            users,
            notifier,
            clock,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Start assigning `stand_points` to every user in `user_ids`.
    ///
    /// Returns immediately. The caller's trace id follows the batch.
    pub fn dispatch(
        &self,
        user_ids: Vec<UserId>,
        stand_points: Vec<StandPointId>,
    ) -> DriveAssignmentHandle {
        let worker = self.clone();
        let task = tokio::spawn(TraceId::carry(async move {
            worker.run_batch(user_ids, stand_points.into()).await
        }));
        DriveAssignmentHandle { task }
    }

    async fn run_batch(
        self,
        user_ids: Vec<UserId>,
        stand_points: Arc<[StandPointId]>,
    ) -> DriveAssignmentReport {
        let mut report = DriveAssignmentReport::default();
        let mut tasks = JoinSet::new();

        for user_id in user_ids {
            // The semaphore is never closed, so acquiring only waits.
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                break;
            };
            let worker = self.clone();
            let stand_points = Arc::clone(&stand_points);
            tasks.spawn(TraceId::carry(async move {
                let outcome = worker.assign_one(user_id, &stand_points).await;
                drop(permit);
                outcome
            }));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.record(outcome),
                Err(err) => {
                    warn!(error = %err, "drive assignment task did not complete");
                    report.lost += 1;
                }
            }
        }

        report.log();
        report
    }

    async fn assign_one(
        &self,
        user_id: UserId,
        stand_points: &[StandPointId],
    ) -> Result<(), AssignmentFailure> {
        let fail = |stage: AssignmentStage, message: String| {
            warn!(user_id = %user_id, ?stage, %message, "drive assignment failed");
            AssignmentFailure {
                user_id,
                stage,
                message,
            }
        };

        let mut user = match self.users.find_by_id(&user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(fail(AssignmentStage::Lookup, "user not found".to_owned())),
            Err(err) => return Err(fail(AssignmentStage::Lookup, err.to_string())),
        };

        user.attach_stand_points(stand_points);
        user.touch(self.clock.utc());

        match self.users.update(&user).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(fail(
                    AssignmentStage::Persist,
                    "user removed before update".to_owned(),
                ));
            }
            Err(err) => return Err(fail(AssignmentStage::Persist, err.to_string())),
        }

        self.notifier
            .send_registration_request(&user)
            .await
            .map_err(|err| fail(AssignmentStage::Notify, err.to_string()))
    }
}

#[cfg(test)]
#[path = "drive_assignment_tests.rs"]
mod tests;
