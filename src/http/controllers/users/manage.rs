use actix_web::{
    web::{self, Json, Path, Query},
    HttpResponse,
};

use crate::http::{Caller, Error};
use crate::policy;
use crate::services::users::{CreateUser, GetUser, ListUsers, SearchUsers, UpdateUser};
use crate::types::{form::users, UserView};
use crate::util::Sensitive;
use crate::validate::Validate;
use crate::App;

fn views(users: Vec<crate::schema::User>) -> Vec<UserView> {
    users.into_iter().map(UserView::from).collect()
}

/// Admin routes settle who is asking before the request input is
/// looked at, so an unprivileged caller never learns the input rules.
fn require_admin(caller: &Caller) -> Result<(), Error> {
    policy::require_active(caller)?;
    policy::require_superuser(caller)
}

#[tracing::instrument(skip_all)]
pub async fn list(
    app: web::Data<App>,
    caller: Caller,
    query: Result<Query<users::ListQuery>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    require_admin(&caller)?;

    let query = query?;
    let users = ListUsers { page: query.page() }.perform(&app, &caller).await?;
    Ok(HttpResponse::Ok().json(views(users)))
}

#[tracing::instrument(skip_all)]
pub async fn search(
    app: web::Data<App>,
    caller: Caller,
    query: Result<Query<users::SearchQuery>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    require_admin(&caller)?;

    let query = query?;
    query.validate().map_err(Error::from)?;

    let users = SearchUsers {
        query: &query.q,
        page: query.page(),
    }
    .perform(&app, &caller)
    .await?;

    Ok(HttpResponse::Ok().json(views(users)))
}

#[tracing::instrument(skip_all)]
pub async fn create(
    app: web::Data<App>,
    caller: Caller,
    form: Result<Json<users::CreateUser>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    require_admin(&caller)?;

    let form = form?;
    form.validate().map_err(Error::from)?;

    let user = CreateUser {
        username: &form.username,
        password: Sensitive::new(form.password.as_str()),
        admin_channels: &form.admin_channels,
        admin_roles: &form.admin_roles,
        disabled: form.disabled,
        email: form.email.as_deref(),
        full_name: form.full_name.as_deref(),
    }
    .perform(&app, &caller)
    .await?;

    Ok(HttpResponse::Ok().json(UserView::from(user)))
}

#[tracing::instrument(skip_all, fields(username = %path.as_str()))]
pub async fn get(
    app: web::Data<App>,
    caller: Caller,
    path: Path<String>,
) -> Result<HttpResponse, Error> {
    let user = GetUser { username: &path }.perform(&app, &caller).await?;
    Ok(HttpResponse::Ok().json(UserView::from(user)))
}

#[tracing::instrument(skip_all, fields(username = %path.as_str()))]
pub async fn update(
    app: web::Data<App>,
    caller: Caller,
    path: Path<String>,
    form: Result<Json<users::UpdateUser>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    require_admin(&caller)?;

    let form = form?;
    form.validate().map_err(Error::from)?;

    let user = UpdateUser {
        username: &path,
        password: form.password.as_ref().map(|v| Sensitive::new(v.as_str())),
        admin_channels: form.admin_channels.as_deref(),
        admin_roles: form.admin_roles.as_deref(),
        disabled: form.disabled,
        email: form.email.as_deref(),
        full_name: form.full_name.as_deref(),
    }
    .perform(&app, &caller)
    .await?;

    Ok(HttpResponse::Ok().json(UserView::from(user)))
}
