use crate::auth::password;
use crate::policy::SUPERUSER_ROLE;
use crate::schema::{NewUser, User};
use crate::store::CredentialStore;

pub const PASSWORD: &str = "correct horse";

pub async fn create(store: &dyn CredentialStore, username: &str) -> User {
    insert(store, NewUser::new(username, hash())).await
}

pub async fn create_superuser(store: &dyn CredentialStore, username: &str) -> User {
    let user = NewUser {
        admin_roles: vec![SUPERUSER_ROLE.to_string()],
        ..NewUser::new(username, hash())
    };
    insert(store, user).await
}

pub async fn create_disabled(store: &dyn CredentialStore, username: &str, superuser: bool) -> User {
    let admin_roles = if superuser {
        vec![SUPERUSER_ROLE.to_string()]
    } else {
        Vec::new()
    };
    let user = NewUser {
        admin_roles,
        disabled: true,
        ..NewUser::new(username, hash())
    };
    insert(store, user).await
}

async fn insert(store: &dyn CredentialStore, user: NewUser) -> User {
    store.insert(user).await.unwrap()
}

fn hash() -> String {
    password::hash(PASSWORD).unwrap()
}
