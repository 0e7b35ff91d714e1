use thiserror::Error;

use crate::http::Error;
use crate::mail::{self, NewAccountEmail};
use crate::schema::User;
use crate::types;
use crate::util::Sensitive;
use crate::App;

mod create;
mod current;
mod get;
mod list;
mod open;
mod update;

pub use self::create::CreateUser;
pub use self::current::{LocalProfile, UpdateLocalProfile};
pub use self::get::GetUser;
pub use self::list::{ListUsers, SearchUsers};
pub use self::open::OpenRegister;
pub use self::update::UpdateUser;

#[derive(Debug, Error)]
#[error("username {0:?} is already taken")]
struct UsernameTaken(String);

#[derive(Debug, Error)]
#[error("user {0:?} does not exist")]
struct UnknownUsername(String);

fn user_exists(username: &str) -> Error {
    Error::from_context(types::Error::UserExists, UsernameTaken(username.to_string()))
}

fn user_not_found(username: &str) -> Error {
    Error::from_context(
        types::Error::UserNotFound,
        UnknownUsername(username.to_string()),
    )
}

/// Checked before hashing so a taken username fails fast. The store
/// insert still rejects the loser of a concurrent race.
async fn ensure_available(app: &App, username: &str) -> Result<(), Error> {
    if app.store.find(username).await?.is_some() {
        return Err(user_exists(username));
    }
    Ok(())
}

fn notify_new_account(app: &App, user: &User, password: &str) {
    if !app.config.emails.enabled {
        return;
    }
    let Some(to) = user.email.clone() else {
        return;
    };

    mail::dispatch_new_account(
        app.mailer.clone(),
        NewAccountEmail {
            to,
            from: app.config.emails.from.clone(),
            project_name: app.config.project_name.clone(),
            username: user.username.clone(),
            password: Sensitive::new(password.to_string()),
        },
    );
}
