use actix_cors::Cors;
use actix_web::http::header;

/// Where the record UI is served from when nothing else is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Lets the record UI read and write customers from another origin.
/// A `*` entry opens the service to any origin.
pub fn configure_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "PUT", "DELETE"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600);

    match allowed_origins {
        [] => cors.allowed_origin(DEFAULT_ORIGIN),
        origins if origins.iter().any(|origin| origin == "*") => cors.allow_any_origin(),
        origins => origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}
