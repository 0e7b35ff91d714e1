use actix_web::{
    web::{self, Form, Json},
    Either, HttpResponse,
};

use crate::http::{Caller, Error};
use crate::services::{login::Login, users::LocalProfile};
use crate::types::{form::login, UserView};
use crate::util::Sensitive;
use crate::validate::Validate;
use crate::App;

/// Accepts the credentials either as a urlencoded form (the OAuth2
/// password flow) or as JSON.
#[tracing::instrument(skip_all)]
pub async fn access_token(
    app: web::Data<App>,
    form: Either<Form<login::Request>, Json<login::Request>>,
) -> Result<HttpResponse, Error> {
    let form = match form {
        Either::Left(Form(form)) => form,
        Either::Right(Json(form)) => form,
    };
    form.validate()?;

    let response = Login {
        username: &form.username,
        password: Sensitive::new(form.password.as_str()),
    }
    .perform(&app)
    .await?;

    Ok(HttpResponse::Ok().json(login::Response::bearer(response.access_token.into_inner())))
}

#[tracing::instrument(skip_all)]
pub async fn test_token(caller: Caller) -> Result<HttpResponse, Error> {
    let user = LocalProfile.perform(&caller)?;
    Ok(HttpResponse::Ok().json(UserView::from(user)))
}
