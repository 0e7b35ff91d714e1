use crate::auth::password;
use crate::http::Error;
use crate::policy;
use crate::schema::{User, UserChanges};
use crate::util::Sensitive;
use crate::App;

/// Partial update of any user by a superuser. Fields left as `None`
/// keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateUser<'a> {
    pub username: &'a str,
    pub password: Option<Sensitive<&'a str>>,
    pub admin_channels: Option<&'a [String]>,
    pub admin_roles: Option<&'a [String]>,
    pub disabled: Option<bool>,
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
}

impl UpdateUser<'_> {
    #[tracing::instrument(skip_all, name = "services.users.update", fields(username = %self.username))]
    pub async fn perform(self, app: &App, caller: &User) -> Result<User, Error> {
        policy::require_active(caller)?;
        policy::require_superuser(caller)?;

        if app.store.find(self.username).await?.is_none() {
            return Err(super::user_not_found(self.username));
        }

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
            disabled: self.disabled,
            admin_channels: self.admin_channels.map(<[String]>::to_vec),
            admin_roles: self.admin_roles.map(<[String]>::to_vec),
        };

        app.store
            .update(self.username, &changes)
            .await?
            .ok_or_else(|| super::user_not_found(self.username))
    }
}
