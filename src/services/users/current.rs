use crate::auth::password;
use crate::http::Error;
use crate::policy;
use crate::schema::{User, UserChanges};
use crate::util::Sensitive;
use crate::App;

/// Returns the caller's own record.
#[derive(Debug)]
pub struct LocalProfile;

impl LocalProfile {
    #[tracing::instrument(skip_all, name = "services.users.me")]
    pub fn perform(self, caller: &User) -> Result<User, Error> {
        policy::require_active(caller)?;
        Ok(caller.clone())
    }
}

/// Lets any active user change their own password, full name and
/// e-mail. Roles, channels and the disabled flag are never touched.
#[derive(Debug, Default)]
pub struct UpdateLocalProfile<'a> {
    pub password: Option<Sensitive<&'a str>>,
    pub full_name: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl UpdateLocalProfile<'_> {
    #[tracing::instrument(skip_all, name = "services.users.update_me")]
    pub async fn perform(self, app: &App, caller: &User) -> Result<User, Error> {
        policy::require_active(caller)?;

        let password_hash = match self.password {
            Some(password) => Some(Sensitive::new(
                password::hash_blocking(password.as_str().to_owned()).await?,
            )),
            None => None,
        };

        let changes = UserChanges {
            password_hash,
            email: self.email.map(ToOwned::to_owned),
            full_name: self.full_name.map(ToOwned::to_owned),
            ..Default::default()
        };

        app.store
            .update(&caller.username, &changes)
            .await?
            .ok_or_else(|| super::user_not_found(&caller.username))
    }
}
