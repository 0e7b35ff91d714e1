use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, LocalBoxFuture};
use thiserror::Error;

use super::Error as HttpError;
use crate::schema::User;
use crate::types;
use crate::App;

/// The user behind the request's bearer token.
///
/// Extraction only proves the token is valid and its holder still
/// exists. Whether the holder is active is checked by each service.
#[derive(Debug)]
pub struct Caller(pub User);

impl std::ops::Deref for Caller {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

impl FromRequest for Caller {
    type Error = HttpError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let Some(app) = req.app_data::<web::Data<App>>().cloned() else {
            #[derive(Debug, Error)]
            #[error("The web app has no available configuration")]
            struct NoConfig;
            return Box::pin(ready(Err(HttpError::from_context(
                types::Error::Internal,
                NoConfig,
            ))));
        };

        let Some(token) = bearer_token(req) else {
            #[derive(Debug, Error)]
            #[error("Missing or malformed bearer token")]
            struct MissingToken;
            return Box::pin(ready(Err(HttpError::from_context(
                types::Error::Unauthenticated,
                MissingToken,
            ))));
        };

        Box::pin(async move {
            let user = app.authenticator.resolve(&token).await?;
            Ok::<_, HttpError>(Caller(user))
        })
    }
}
