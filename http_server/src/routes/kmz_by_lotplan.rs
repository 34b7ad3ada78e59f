use actix_web::{web, HttpRequest, HttpResponse};
use cadastral::Outcome;
use serde::Deserialize;

use crate::app_container::Application;
use crate::authentication::AuthenticatedCaller;
use crate::errors::ApiError;
use crate::routes::kmz_response;

#[derive(Deserialize, Debug)]
struct Request {
    lotplan: String,
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn kmz_by_lotplan(
    data: web::Query<Request>,
    app: web::Data<Application>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let _caller: AuthenticatedCaller = (&req).try_into()?;
    let output = app.operations.kmz_by_lotplan(&data.lotplan).await?;
    if output.outcome == Outcome::NothingFound {
        return Err(ApiError::NotFound(
            "No parcels found for given Lot/Plan token(s).".to_string(),
        ));
    }
    Ok(kmz_response(output))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/kmz_by_lotplan").route(web::get().to(kmz_by_lotplan)));
}
