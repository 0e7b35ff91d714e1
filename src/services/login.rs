use thiserror::Error as ThisError;

use crate::auth::password;
use crate::http::Error;
use crate::policy;
use crate::schema::User;
use crate::types;
use crate::util::Sensitive;
use crate::App;

#[derive(Debug, ThisError)]
#[error("username or password did not match")]
struct BadCredentials;

/// Exchanges a username and password for an access token.
#[derive(Debug)]
pub struct Login<'a> {
    pub username: &'a str,
    pub password: Sensitive<&'a str>,
}

#[must_use]
#[derive(Debug)]
pub struct LoginResponse {
    pub user: User,
    pub access_token: Sensitive<String>,
}

impl Login<'_> {
    #[tracing::instrument(skip_all, name = "services.login", fields(username = %self.username))]
    pub async fn perform(self, app: &App) -> Result<LoginResponse, Error> {
        let Some(user) = app.store.find(self.username).await? else {
            return Err(Error::from_context(
                types::Error::IncorrectCredentials,
                BadCredentials,
            ));
        };

        let matched = password::verify_blocking(
            self.password.as_str().to_owned(),
            user.password_hash.clone(),
        )
        .await?;

        if !matched {
            return Err(Error::from_context(
                types::Error::IncorrectCredentials,
                BadCredentials,
            ));
        }

        policy::require_active(&user)?;

        let access_token = app.authenticator.issue(&user)?;
        Ok(LoginResponse {
            user,
            access_token: Sensitive::new(access_token),
        })
    }
}
