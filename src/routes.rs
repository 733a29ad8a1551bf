use crate::{api::leave_form, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, get, web};
use std::sync::Arc;

pub type ActionLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter. `None` only if the governor rejects the quota.
pub fn build_limiter(requests_per_min: u32) -> Option<ActionLimiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<ActionLimiter>) {
    cfg.service(health);

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/leave")
                .wrap(limiter)
                // /leave/validate
                .service(
                    web::resource("/validate")
                        .route(web::post().to(leave_form::validate_duration)),
                )
                // /leave/submit
                .service(
                    web::resource("/submit").route(web::post().to(leave_form::submit_leave)),
                )
                // /leave/{sender_id}
                .service(
                    web::resource("/{sender_id}").route(web::get().to(leave_form::leave_history)),
                ),
        ),
    );
}
