//! Tests for the drive matching service.

use std::collections::HashMap;
use std::sync::Mutex;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{DriveStandPoint, MockRegistrationNotifier, MockUserRepository};
use crate::domain::test_fixtures::{FixtureClock, user_at};
use crate::domain::{ErrorCode, Geometry, NearbyUser, StandPointId, User, UserId};

fn service(users: MockUserRepository, notifier: MockRegistrationNotifier) -> DriveMatchingService {
    let users: Arc<dyn UserRepository> = Arc::new(users);
    let worker = DriveAssignmentWorker::new(
        Arc::clone(&users),
        Arc::new(notifier),
        Arc::new(FixtureClock::default()),
        4,
    );
    DriveMatchingService::new(users, worker)
}

fn candidate(longitude: f64, latitude: f64) -> DriveStandPoint {
    DriveStandPoint {
        id: Some(StandPointId::random()),
        geometry: Geometry::point(longitude, latitude),
    }
}

#[fixture]
fn candidates() -> Vec<DriveStandPoint> {
    vec![
        candidate(80.7, 22.3),
        candidate(81.2, 23.0),
        candidate(79.9, 21.8),
    ]
}

#[rstest]
#[tokio::test]
async fn empty_candidates_fail_without_querying() {
    let mut users = MockUserRepository::new();
    users.expect_find_within_radius().times(0);

    let err = service(users, MockRegistrationNotifier::new())
        .create_drive(CreateDriveRequest {
            stand_points: Vec::new(),
        })
        .await
        .expect_err("empty drive must fail");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "No drive points found");
}

#[rstest]
#[tokio::test]
async fn queries_once_at_first_candidate_with_fixed_radius(candidates: Vec<DriveStandPoint>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_within_radius()
        .withf(|origin, radius| {
            origin.coordinates() == [80.7, 22.3] && (*radius - 3000.0).abs() < f64::EPSILON
        })
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let err = service(users, MockRegistrationNotifier::new())
        .create_drive(CreateDriveRequest {
            stand_points: candidates,
        })
        .await
        .expect_err("no users in range");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "No users within range of drive points found");
}

#[rstest]
#[tokio::test]
async fn connection_failure_is_service_unavailable(candidates: Vec<DriveStandPoint>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_within_radius()
        .return_once(|_, _| Err(UserPersistenceError::connection("pool timed out")));

    let err = service(users, MockRegistrationNotifier::new())
        .create_drive(CreateDriveRequest {
            stand_points: candidates,
        })
        .await
        .expect_err("store offline");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn returns_proximity_result_and_attaches_every_candidate(
    candidates: Vec<DriveStandPoint>,
) {
    let near = user_at(80.701, 22.301);
    let nearer = user_at(80.7001, 22.3001);
    let matched = vec![
        NearbyUser::new(nearer.clone(), 14.2),
        NearbyUser::new(near.clone(), 142.0),
    ];
    let expected_ids: Vec<StandPointId> = candidates.iter().filter_map(|c| c.id).collect();

    let stored: Arc<Mutex<HashMap<UserId, User>>> = Arc::new(Mutex::new(
        [(*near.id(), near), (*nearer.id(), nearer)].into_iter().collect(),
    ));
    let mut users = MockUserRepository::new();
    let proximity_result = matched.clone();
    users
        .expect_find_within_radius()
        .times(1)
        .return_once(move |_, _| Ok(proximity_result));
    let lookup = Arc::clone(&stored);
    users
        .expect_find_by_id()
        .times(2)
        .returning(move |id| Ok(lookup.lock().expect("store").get(id).cloned()));
    let writes = Arc::clone(&stored);
    users.expect_update().times(2).returning(move |user| {
        writes
            .lock()
            .expect("store")
            .insert(*user.id(), user.clone());
        Ok(true)
    });
    let mut notifier = MockRegistrationNotifier::new();
    notifier
        .expect_send_registration_request()
        .times(2)
        .returning(|_| Ok(()));

    let response = service(users, notifier)
        .create_drive(CreateDriveRequest {
            stand_points: candidates,
        })
        .await
        .expect("drive created");

    assert_eq!(response.matched_users, matched);
    let report = response.assignment.settled().await.expect("batch settles");
    assert_eq!(report.assigned, 2);

    for user in stored.lock().expect("store").values() {
        assert_eq!(user.map_view_stand_points(), expected_ids.as_slice());
    }
}

#[rstest]
#[tokio::test]
async fn candidates_without_ids_only_steer_the_search() {
    let user = user_at(80.7, 22.3);
    let user_id = *user.id();
    let mut users = MockUserRepository::new();
    let snapshot = NearbyUser::new(user.clone(), 0.0);
    users
        .expect_find_within_radius()
        .return_once(move |_, _| Ok(vec![snapshot]));
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    users
        .expect_update()
        .withf(|updated| updated.map_view_stand_points().is_empty())
        .times(1)
        .return_once(|_| Ok(true));
    let mut notifier = MockRegistrationNotifier::new();
    notifier
        .expect_send_registration_request()
        .return_once(|_| Ok(()));

    let response = service(users, notifier)
        .create_drive(CreateDriveRequest {
            stand_points: vec![DriveStandPoint {
                id: None,
                geometry: Geometry::point(80.7, 22.3),
            }],
        })
        .await
        .expect("drive created");

    assert_eq!(*response.matched_users[0].user.id(), user_id);
    response.assignment.settled().await.expect("batch settles");
}
