use actix_web::{http::header, web, FromRequest};
use futures::future::{ready, LocalBoxFuture};
use thiserror::Error;

use crate::{schema::User, App};

use super::{Error, Jwt};

/// The resolved caller identity. Routes that require a signed-in
/// user call [`Actor::get_user`]; everything else treats
/// [`Actor::Anonymous`] as a regular guest.
#[derive(Debug)]
pub enum Actor {
    Anonymous,
    User(User),
}

impl Actor {
    pub fn get_user(self) -> Result<User, Error> {
        #[derive(Debug, Error)]
        #[error("Attempt to access user-only route")]
        struct Unauthorized;
        match self {
            Self::User(n) => Ok(n),
            Self::Anonymous => Err(Error::from_context(
                crate::types::Error::Unauthorized,
                Unauthorized,
            )),
        }
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_owned);

        let Some(token) = token else {
            return Box::pin(ready(Ok(Actor::Anonymous)));
        };

        let Some(app) = req.app_data::<web::Data<App>>() else {
            #[derive(Debug, Error)]
            #[error("The web app has no available configuration")]
            struct NoConfig;
            return Box::pin(ready(Err(Error::from_context(
                crate::types::Error::Internal,
                NoConfig,
            ))));
        };

        let app = app.clone();
        Box::pin(async move {
            // A token that fails verification is an explicit rejection,
            // not a downgrade to guest access.
            let jwt = match Jwt::decode(&token, app.as_ref()) {
                Ok(jwt) => jwt,
                Err(report) => {
                    return Err(Error::from_report(crate::types::Error::Unauthorized, report))
                }
            };

            let mut conn = app.db_read_prefer_primary().await?;
            if let Some(user) = User::by_id(&mut *conn, jwt.user_id).await? {
                Ok(Actor::User(user))
            } else {
                Ok(Actor::Anonymous)
            }
        })
    }
}
