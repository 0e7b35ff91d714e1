use thiserror::Error as ThisError;

use crate::auth::password;
use crate::http::Error;
use crate::schema::{NewUser, User};
use crate::types;
use crate::util::Sensitive;
use crate::App;

#[derive(Debug, ThisError)]
#[error("open registration is disabled")]
struct RegistrationDisabled;

/// Self-service sign up, available only when open registration is
/// enabled. New accounts never get roles or channels.
#[derive(Debug)]
pub struct OpenRegister<'a> {
    pub username: &'a str,
    pub password: Sensitive<&'a str>,
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
}

impl OpenRegister<'_> {
    /// Fails with [`types::Error::RegistrationClosed`] while open
    /// registration is turned off.
    pub fn ensure_enabled(app: &App) -> Result<(), Error> {
        if app.config.users_open_registration {
            Ok(())
        } else {
            Err(Error::from_context(
                types::Error::RegistrationClosed,
                RegistrationDisabled,
            ))
        }
    }

    #[tracing::instrument(skip_all, name = "services.users.register_open", fields(username = %self.username))]
    pub async fn perform(self, app: &App) -> Result<User, Error> {
        Self::ensure_enabled(app)?;
        super::ensure_available(app, self.username).await?;

        let password_hash = password::hash_blocking(self.password.as_str().to_owned()).await?;
        let user = NewUser {
            email: self.email.map(ToOwned::to_owned),
            full_name: self.full_name.map(ToOwned::to_owned),
            ..NewUser::new(self.username, password_hash)
        };

        Ok(app.store.insert(user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, users};

    fn request(username: &str) -> OpenRegister<'_> {
        OpenRegister {
            username,
            password: Sensitive::new("hunter22"),
            email: Some("someone@example.com"),
            full_name: None,
        }
    }

    #[tokio::test]
    async fn registers_plain_account_when_enabled() {
        let test = test_utils::build_test_app_with(|cfg| cfg.users_open_registration = true);

        let user = request("dave").perform(&test.app).await.unwrap();
        assert_eq!(user.username, "dave");
        assert_eq!(user.email.as_deref(), Some("someone@example.com"));
        assert!(user.admin_roles.is_empty());
        assert!(user.admin_channels.is_empty());
        assert!(!user.disabled);
        assert!(password::verify("hunter22", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn closed_registration_is_forbidden() {
        let test = test_utils::build_test_app();

        let error = request("dave").perform(&test.app).await.unwrap_err();
        assert_eq!(error.as_type(), &types::Error::RegistrationClosed);
        assert!(test.store.is_empty().await);
    }

    #[tokio::test]
    async fn taken_username_conflicts() {
        let test = test_utils::build_test_app_with(|cfg| cfg.users_open_registration = true);
        users::create(test.store.as_ref(), "bob").await;

        let error = request("bob").perform(&test.app).await.unwrap_err();
        assert_eq!(error.as_type(), &types::Error::UserExists);
    }
}
