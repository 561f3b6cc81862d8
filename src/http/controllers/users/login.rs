use actix_web::{web, HttpResponse};
use validator::{Validate, ValidateError};

use crate::http::{Error, Jwt};
use crate::schema::User;
use crate::types::{self, form::users::login};
use crate::{auth, App};

fn invalid_credentials() -> Error {
    let mut error = ValidateError::field_builder();
    let mut contents = ValidateError::msg_builder();
    contents.insert("Invalid credentials");
    error.insert("username_or_email", contents.build());
    error.build().into()
}

#[tracing::instrument(skip(form))]
pub async fn post(
    app: web::Data<App>,
    form: web::Json<login::Request>,
) -> Result<HttpResponse, Error> {
    form.validate()?;

    // We need to get the latest info as soon as possible
    let mut conn = app.db_read_prefer_primary().await?;

    let Some(user) = User::by_username_or_email(&mut *conn, form.username_or_email.as_str()).await?
    else {
        return Err(invalid_credentials());
    };

    drop(conn);

    let matched = auth::verify_password(form.password.as_str().as_bytes(), &user.password_hash)
        .map_err(|e| Error::from_report(types::Error::Internal, e))?;

    if !matched {
        return Err(invalid_credentials());
    }

    let token = Jwt::encode(user.id, &app)
        .await
        .map_err(|e| Error::from_report(types::Error::Internal, e))?;

    Ok(HttpResponse::Ok().json(login::Response {
        id: user.id,
        token: token.into(),
    }))
}
