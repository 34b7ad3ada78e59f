use actix_web::{web, HttpRequest, HttpResponse};
use cadastral::{AddressFields, Outcome};
use serde::Deserialize;

use crate::app_container::Application;
use crate::authentication::AuthenticatedCaller;
use crate::errors::ApiError;
use crate::routes::kmz_response;

#[derive(Deserialize, Debug)]
struct AddressRequest {
    address: String,
}

/// Free-text address. An address the Address layer cannot match still
/// downloads as an empty, valid KMZ.
#[tracing::instrument(err, skip(app), level = "info")]
async fn kmz_by_address(
    body: web::Json<AddressRequest>,
    app: web::Data<Application>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let _caller: AuthenticatedCaller = (&req).try_into()?;
    let output = app.operations.kmz_by_address(&body.address).await?;
    Ok(kmz_response(output))
}

/// Legacy structured-address variant.
#[tracing::instrument(err, skip(app, body), level = "info")]
async fn kmz_by_address_fields(
    body: web::Json<AddressFields>,
    app: web::Data<Application>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let _caller: AuthenticatedCaller = (&req).try_into()?;
    let output = app.operations.kmz_by_address_fields(&body.into_inner()).await?;
    if output.outcome == Outcome::NothingFound {
        return Err(ApiError::NotFound(
            "No parcels found from provided address.".to_string(),
        ));
    }
    Ok(kmz_response(output))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/kmz_by_address").route(web::post().to(kmz_by_address)))
        .service(
            web::resource("/kmz_by_address_fields")
                .route(web::post().to(kmz_by_address_fields)),
        );
}
