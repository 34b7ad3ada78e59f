mod kmz_by_address;
mod kmz_by_lotplan;
mod process_pdf_kmz;

use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{web, HttpResponse};
use parcel_resolution::KmzOutput;

const KMZ_CONTENT_TYPE: &str = "application/vnd.google-earth.kmz";

async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("ok")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .configure(process_pdf_kmz::init_routes)
        .configure(kmz_by_lotplan::init_routes)
        .configure(kmz_by_address::init_routes);
}

/// The download response shared by every KMZ-producing route.
pub(crate) fn kmz_response(output: KmzOutput) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(KMZ_CONTENT_TYPE)
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.kmz\"", output.name),
        ))
        .body(output.document.into_bytes())
}
