use crate::auth::password;
use crate::http::Error;
use crate::policy;
use crate::schema::{NewUser, User};
use crate::util::Sensitive;
use crate::App;

#[derive(Debug)]
pub struct CreateUser<'a> {
    pub username: &'a str,
    pub password: Sensitive<&'a str>,
    pub admin_channels: &'a [String],
    pub admin_roles: &'a [String],
    pub disabled: bool,
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
}

impl CreateUser<'_> {
    #[tracing::instrument(skip_all, name = "services.users.create", fields(username = %self.username))]
    pub async fn perform(self, app: &App, caller: &User) -> Result<User, Error> {
        policy::require_active(caller)?;
        policy::require_superuser(caller)?;
        super::ensure_available(app, self.username).await?;

        let password_hash = password::hash_blocking(self.password.as_str().to_owned()).await?;
        let user = NewUser {
            email: self.email.map(ToOwned::to_owned),
            full_name: self.full_name.map(ToOwned::to_owned),
            disabled: self.disabled,
            admin_channels: self.admin_channels.to_vec(),
            admin_roles: self.admin_roles.to_vec(),
            ..NewUser::new(self.username, password_hash)
        };

        let user = app.store.insert(user).await?;
        super::notify_new_account(app, &user, self.password.as_str());

        Ok(user)
    }
}
