//! Wiring of driven adapters into the services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use vaxdrive::domain::ports::{
    AuthorityLoginService, RegistrationNotifier, StandPointRepository, UserRepository,
};
use vaxdrive::domain::{
    DriveAssignmentWorker, DriveMatchingService, RegisteredUsersService, StandPointService,
    UserSignUpService,
};
use vaxdrive::inbound::http::state::HttpState;
use vaxdrive::outbound::memory::InMemoryStore;
use vaxdrive::outbound::notify::{HttpRegistrationNotifier, LogRegistrationNotifier};
use vaxdrive::outbound::persistence::{DieselStandPointRepository, DieselUserRepository};

use super::ServerConfig;

fn build_notifier(config: &ServerConfig) -> std::io::Result<Arc<dyn RegistrationNotifier>> {
    match &config.mail_relay {
        Some((endpoint, timeout)) => {
            info!(relay = %endpoint, "registration requests go to mail relay");
            let notifier = HttpRegistrationNotifier::new(endpoint.clone(), *timeout)
                .map_err(|err| std::io::Error::other(format!("mail relay client: {err}")))?;
            Ok(Arc::new(notifier))
        }
        None => {
            info!("no mail relay configured; registration requests are logged");
            Ok(Arc::new(LogRegistrationNotifier))
        }
    }
}

fn build_services<S, U>(
    config: &ServerConfig,
    stand_points: Arc<S>,
    users: Arc<U>,
    notifier: Arc<dyn RegistrationNotifier>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    S: StandPointRepository + 'static,
    U: UserRepository + 'static,
{
    let shared_users: Arc<dyn UserRepository> = users.clone();
    let worker = DriveAssignmentWorker::new(
        Arc::clone(&shared_users),
        notifier,
        clock,
        config.assignment_concurrency,
    );
    let login = match &config.authority_account {
        Some(account) => AuthorityLoginService::new(account.clone()),
        None => AuthorityLoginService::disabled(),
    };
    HttpState {
        login: Arc::new(login),
        sign_up: Arc::new(UserSignUpService::new(users.clone())),
        stand_points: Arc::new(StandPointService::new(stand_points)),
        drives: Arc::new(DriveMatchingService::new(shared_users, worker)),
        registered_users: Arc::new(RegisteredUsersService::new(users)),
    }
}

/// Build HTTP state over PostgreSQL when a pool is configured, otherwise over
/// a fresh in-memory store.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let notifier = build_notifier(config)?;
    let state = match &config.db_pool {
        Some(pool) => build_services(
            config,
            Arc::new(DieselStandPointRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
            notifier,
            clock,
        ),
        None => {
            info!("no database configured; using in-memory store");
            let store = Arc::new(InMemoryStore::new(Arc::clone(&clock)));
            build_services(config, Arc::clone(&store), store, notifier, clock)
        }
    };
    Ok(web::Data::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use actix_web::cookie::{Key, SameSite};
    use rstest::rstest;
    use vaxdrive::domain::{Geometry, LoginCredentials, NewUser};

    fn config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            SocketAddr::from(([127, 0, 0, 1], 0)),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn in_memory_state_shares_one_store() {
        let state = build_http_state(&config()).expect("state builds");
        let user = state
            .sign_up
            .sign_up(
                NewUser::try_new("Asha", "asha@example.org", None, Geometry::point(80.7, 22.3))
                    .expect("valid user"),
            )
            .await
            .expect("sign-up succeeds");

        let drive = state
            .drives
            .create_drive(vaxdrive::domain::ports::CreateDriveRequest {
                stand_points: vec![vaxdrive::domain::ports::DriveStandPoint {
                    id: None,
                    geometry: Geometry::point(80.7, 22.3),
                }],
            })
            .await
            .expect("drive matches the signed-up user");

        assert_eq!(drive.matched_users.len(), 1);
        assert_eq!(drive.matched_users[0].user.id(), user.id());
    }

    #[rstest]
    #[tokio::test]
    async fn login_follows_configured_account() {
        let account = LoginCredentials::try_from_parts("authority", "s3cret").expect("valid");
        let enabled = build_http_state(&config().with_authority_account(Some(account.clone())))
            .expect("state builds");
        let disabled = build_http_state(&config()).expect("state builds");

        assert!(enabled.login.authenticate(&account).await.is_ok());
        assert!(disabled.login.authenticate(&account).await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn mail_relay_selects_http_notifier() {
        let relay = reqwest::Url::parse("http://127.0.0.1:9/send").expect("url");
        let config = config().with_mail_relay(relay, std::time::Duration::from_secs(1));
        assert!(build_http_state(&config).is_ok());
    }
}
