//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, web};

use crate::Trace;
use crate::domain::ports::{
    MockDriveCommand, MockLoginService, MockRegisteredUsersQuery, MockStandPointCommand,
    MockUserSignUp,
};
use crate::domain::{AuthorityId, Error};
use crate::inbound::http::error::json_config;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub(crate) const TEST_LOGIN_PATH: &str = "/__test/login";

/// Session middleware with a fresh key, cookie name `session`, and the
/// `Secure` flag off for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Route that logs in a random authority without credentials.
pub fn test_login_route(cfg: &mut web::ServiceConfig) {
    cfg.route(
        TEST_LOGIN_PATH,
        web::post().to(|session: SessionContext| async move {
            session.persist_authority(&AuthorityId::random())?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        }),
    );
}

/// Request hitting [`test_login_route`] under the `/api/v1` scope.
pub fn login_request() -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post().uri(&format!("/api/v1{TEST_LOGIN_PATH}"))
}

/// Mocked driving ports; unconfigured mocks panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub sign_up: MockUserSignUp,
    pub stand_points: MockStandPointCommand,
    pub drives: MockDriveCommand,
    pub registered_users: MockRegisteredUsersQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            sign_up: Arc::new(self.sign_up),
            stand_points: Arc::new(self.stand_points),
            drives: Arc::new(self.drives),
            registered_users: Arc::new(self.registered_users),
        }
    }
}

/// App exposing `routes` under `/api/v1` with sessions, tracing, JSON error
/// mapping, and the credential-less test login route.
pub fn test_app(
    state: HttpState,
    routes: fn(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(test_login_route)
                .configure(routes),
        )
}
