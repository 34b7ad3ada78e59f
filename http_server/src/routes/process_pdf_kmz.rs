use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use cadastral::Outcome;
use futures_util::TryStreamExt;

use crate::app_container::Application;
use crate::authentication::AuthenticatedCaller;
use crate::errors::ApiError;
use crate::routes::kmz_response;

const PDF_FIELD: &str = "pdf";

#[tracing::instrument(err, skip_all, level = "info")]
async fn process_pdf_kmz(
    mut payload: Multipart,
    app: web::Data<Application>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let _caller: AuthenticatedCaller = (&req).try_into()?;
    let pdf_bytes = read_pdf_field(&mut payload).await?;
    let output = app.operations.process_pdf_to_kmz(&pdf_bytes).await?;
    if output.outcome == Outcome::NothingFound {
        return Err(ApiError::NotFound(
            "No parcels found for the extracted details.".to_string(),
        ));
    }
    Ok(kmz_response(output))
}

async fn read_pdf_field(payload: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    let bad_body = |err| ApiError::BadRequest(format!("Invalid multipart body: {err}"));
    while let Some(mut field) = payload.try_next().await.map_err(bad_body)? {
        if field.name() != PDF_FIELD {
            continue;
        }
        let filename_is_pdf = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_lowercase().ends_with(".pdf"));
        if filename_is_pdf == Some(false) {
            return Err(ApiError::BadRequest("Please upload a PDF file.".to_string()));
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_body)? {
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }
    Err(ApiError::BadRequest(format!(
        "Expected a multipart field named `{PDF_FIELD}`"
    )))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/process_pdf_kmz").route(web::post().to(process_pdf_kmz)));
}
