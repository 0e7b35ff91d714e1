use actix_web::{
    web::{self, Json},
    HttpResponse,
};

use crate::http::{Caller, Error};
use crate::policy;
use crate::services::users::{LocalProfile, UpdateLocalProfile};
use crate::types::{form::users, UserView};
use crate::util::Sensitive;
use crate::validate::Validate;
use crate::App;

#[tracing::instrument(skip_all)]
pub async fn me(caller: Caller) -> Result<HttpResponse, Error> {
    let user = LocalProfile.perform(&caller)?;
    Ok(HttpResponse::Ok().json(UserView::from(user)))
}

#[tracing::instrument(skip_all)]
pub async fn update_me(
    app: web::Data<App>,
    caller: Caller,
    form: Result<Json<users::UpdateCurrentUser>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    policy::require_active(&caller)?;

    let form = form?;
    form.validate().map_err(Error::from)?;

    let user = UpdateLocalProfile {
        password: form.password.as_ref().map(|v| Sensitive::new(v.as_str())),
        full_name: form.full_name.as_deref(),
        email: form.email.as_deref(),
    }
    .perform(&app, &caller)
    .await?;

    Ok(HttpResponse::Ok().json(UserView::from(user)))
}
