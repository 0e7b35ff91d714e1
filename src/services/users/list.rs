use crate::http::Error;
use crate::policy;
use crate::schema::User;
use crate::store::Page;
use crate::App;

#[derive(Debug)]
pub struct ListUsers {
    pub page: Page,
}

impl ListUsers {
    #[tracing::instrument(skip_all, name = "services.users.list")]
    pub async fn perform(self, app: &App, caller: &User) -> Result<Vec<User>, Error> {
        policy::require_active(caller)?;
        policy::require_superuser(caller)?;
        Ok(app.store.list(self.page).await?)
    }
}

#[derive(Debug)]
pub struct SearchUsers<'a> {
    pub query: &'a str,
    pub page: Page,
}

impl SearchUsers<'_> {
    #[tracing::instrument(skip_all, name = "services.users.search")]
    pub async fn perform(self, app: &App, caller: &User) -> Result<Vec<User>, Error> {
        policy::require_active(caller)?;
        policy::require_superuser(caller)?;
        Ok(app.store.search(self.query.trim(), self.page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, users};
    use crate::types;

    #[tokio::test]
    async fn superuser_lists_in_username_order() {
        let test = test_utils::build_test_app();
        let alice = users::create_superuser(test.store.as_ref(), "alice").await;
        users::create(test.store.as_ref(), "carol").await;
        users::create(test.store.as_ref(), "bob").await;

        let all = ListUsers { page: Page::default() }
            .perform(&test.app, &alice)
            .await
            .unwrap();
        let names = all.iter().map(|u| u.username.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["alice", "bob", "carol"]);

        let second = ListUsers { page: Page::new(1, 1) }
            .perform(&test.app, &alice)
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].username, "bob");
    }

    #[tokio::test]
    async fn regular_users_cannot_list() {
        let test = test_utils::build_test_app();
        let bob = users::create(test.store.as_ref(), "bob").await;

        let error = ListUsers { page: Page::default() }
            .perform(&test.app, &bob)
            .await
            .unwrap_err();
        assert_eq!(error.as_type(), &types::Error::Forbidden);
    }

    #[tokio::test]
    async fn disabled_superuser_is_rejected_as_inactive() {
        let test = test_utils::build_test_app();
        let alice = users::create_disabled(test.store.as_ref(), "alice", true).await;

        let error = SearchUsers { query: "a", page: Page::default() }
            .perform(&test.app, &alice)
            .await
            .unwrap_err();
        assert_eq!(error.as_type(), &types::Error::InactiveUser);
    }

    #[tokio::test]
    async fn search_matches_username_substring() {
        let test = test_utils::build_test_app();
        let alice = users::create_superuser(test.store.as_ref(), "alice").await;
        users::create(test.store.as_ref(), "bobby").await;
        users::create(test.store.as_ref(), "carol").await;

        let found = SearchUsers { query: " BOB ", page: Page::default() }
            .perform(&test.app, &alice)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "bobby");
    }
}
