use actix_web::{web, HttpResponse};
use validator::{Validate, ValidateError};

use crate::http::{Error, Jwt};
use crate::schema::user::NewUser;
use crate::schema::User;
use crate::types::{self, form::users::register};
use crate::{auth, App};

#[tracing::instrument(skip(form))]
pub async fn post(
    app: web::Data<App>,
    form: web::Json<register::Request>,
) -> Result<HttpResponse, Error> {
    form.validate()?;

    // We need to get the latest info as soon as possible because many
    // users will try to reserve their own user names.
    let mut conn = app.db_write().await?;

    if User::by_username(&mut *conn, form.username.as_str())
        .await?
        .is_some()
    {
        let mut error = ValidateError::field_builder();
        let mut contents = ValidateError::msg_builder();
        contents.insert("Username is already taken");
        error.insert("username", contents.build());
        return Err(error.build().into());
    }

    if User::by_email(&mut *conn, form.email.as_str())
        .await?
        .is_some()
    {
        let mut error = ValidateError::field_builder();
        let mut contents = ValidateError::msg_builder();
        contents.insert("E-mail address is already taken");
        error.insert("email", contents.build());
        return Err(error.build().into());
    }

    let password_hash = auth::hash_password(form.password.as_str())
        .map_err(|e| Error::from_report(types::Error::Internal, e))?;

    let user = User::create(
        &mut *conn,
        NewUser {
            username: form.username.as_str(),
            email: form.email.as_str(),
            password_hash: &password_hash,
            full_name: &form.full_name,
        },
    )
    .await?;

    drop(conn);

    tracing::info!("user {} registered", user.id);

    let token = Jwt::encode(user.id, &app)
        .await
        .map_err(|e| Error::from_report(types::Error::Internal, e))?;

    Ok(HttpResponse::Created().json(register::Response {
        id: user.id,
        token: token.into(),
    }))
}
