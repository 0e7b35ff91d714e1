use actix_web::{
    web::{self, Json},
    HttpResponse,
};

use crate::http::Error;
use crate::services::users::OpenRegister;
use crate::types::{form::users, UserView};
use crate::util::Sensitive;
use crate::validate::Validate;
use crate::App;

/// The registration switch is checked before the body is looked at,
/// so a closed server answers the same way to any payload.
#[tracing::instrument(skip_all)]
pub async fn register_open(
    app: web::Data<App>,
    form: Result<Json<users::OpenRegister>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    OpenRegister::ensure_enabled(&app)?;

    let form = form?;
    form.validate().map_err(Error::from)?;

    let user = OpenRegister {
        username: &form.username,
        password: Sensitive::new(form.password.as_str()),
        email: form.email.as_deref(),
        full_name: form.full_name.as_deref(),
    }
    .perform(&app)
    .await?;

    Ok(HttpResponse::Ok().json(UserView::from(user)))
}
