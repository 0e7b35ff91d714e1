use crate::http::Error;
use crate::policy;
use crate::schema::User;
use crate::App;

#[derive(Debug)]
pub struct GetUser<'a> {
    pub username: &'a str,
}

impl GetUser<'_> {
    /// Users may always read their own record. Anyone else needs the
    /// superuser role, and only superusers learn whether an unknown
    /// username exists.
    #[tracing::instrument(skip_all, name = "services.users.get", fields(username = %self.username))]
    pub async fn perform(self, app: &App, caller: &User) -> Result<User, Error> {
        policy::require_active(caller)?;

        let target = app.store.find(self.username).await?;
        if let Some(target) = target.filter(|target| policy::can_view(caller, target)) {
            return Ok(target);
        }

        policy::require_superuser(caller)?;
        Err(super::user_not_found(self.username))
    }
}
