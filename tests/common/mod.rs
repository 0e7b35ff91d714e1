#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use userbase::policy::SUPERUSER_ROLE;
use userbase::schema::NewUser;
use userbase::store::{CredentialStore, MemoryStore};
use userbase::{config, mail::LogMailer, App};

pub const PASSWORD: &str = "correct horse";
pub const PREFIX: &str = "/api/v1";

/// Builds the routed test service for an [`App`].
macro_rules! init_service {
    ($app:expr) => {{
        let app: &userbase::App = &$app;
        let prefix = app.config.api_prefix.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(app.clone()))
                .configure(move |cfg| userbase::http::controllers::configure(cfg, &prefix)),
        )
        .await
    }};
}

pub fn build_app(configure: impl FnOnce(&mut config::Server)) -> (App, Arc<MemoryStore>) {
    let mut cfg = config::Server::new("integration test secret");
    configure(&mut cfg);

    let store = Arc::new(MemoryStore::new());
    let app = App::from_parts(cfg, store.clone(), Arc::new(LogMailer));
    (app, store)
}

pub async fn add_user(store: &MemoryStore, username: &str, superuser: bool, disabled: bool) {
    let admin_roles = if superuser {
        vec![SUPERUSER_ROLE.to_string()]
    } else {
        Vec::new()
    };
    let user = NewUser {
        admin_roles,
        disabled,
        ..NewUser::new(username, cheap_hash(PASSWORD))
    };
    store.insert(user).await.unwrap();
}

/// Argon2id with minimal cost. Verification reads the parameters back
/// from the hash, so the service accepts it like any other.
fn cheap_hash(password: &str) -> String {
    let params = Params::new(1024, 1, 1, None).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

/// Issues a token directly, bypassing the login route.
pub async fn token_for(app: &App, username: &str) -> String {
    let user = app.store.find(username).await.unwrap().unwrap();
    app.authenticator.issue(&user).unwrap()
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (actix_web::http::header::AUTHORIZATION, format!("Bearer {token}"))
}
