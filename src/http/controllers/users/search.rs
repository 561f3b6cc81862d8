use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::ValidateError;

use crate::http::Error;
use crate::schema::User;
use crate::types::Pager;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct Query {
    pub name: Option<String>,
}

#[tracing::instrument]
pub async fn get(
    app: web::Data<App>,
    query: web::Query<Query>,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let Some(name) = query.name.as_deref().filter(|v| !v.is_empty()) else {
        let mut error = ValidateError::field_builder();
        let mut contents = ValidateError::msg_builder();
        contents.insert("Name parameter is required");
        error.insert("name", contents.build());
        return Err(error.build().into());
    };

    let mut conn = app.db_read().await?;
    let users = User::search_by_name(&mut *conn, name, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "users": users,
        "pagination": pager.block(&users),
    })))
}
