pub mod auth;
pub mod bids;
pub mod contracts;
pub mod payments;
pub mod requirements;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── Requirement routes ──
    cfg.service(
        web::scope("/requirements")
            .route("", web::post().to(requirements::create_requirement))
            .route("/mine", web::get().to(requirements::get_my_requirements))
            .route("/{id}", web::get().to(requirements::get_requirement)),
    );

    // ── Bid routes (interest signals + priced quotes) ──
    cfg.service(
        web::scope("/bids")
            .route("/requests", web::post().to(bids::request_quote))
            .route(
                "/requests/company",
                web::get().to(bids::get_bid_requests_for_company),
            )
            .route(
                "/requests/requirement/{id}",
                web::get().to(bids::get_bid_requests_for_requirement),
            )
            .route(
                "/requests/{id}/decline",
                web::post().to(bids::decline_bid_request),
            )
            .route("", web::post().to(bids::submit_quote))
            .route(
                "/requirement/{id}",
                web::get().to(bids::get_quotes_for_requirement),
            )
            .route("/status/{requirement_id}", web::get().to(bids::quote_status))
            .route("/submitted", web::get().to(bids::get_submitted_bids))
            .route("/{id}/accept", web::post().to(bids::accept_quote))
            .route("/{id}/decline", web::post().to(bids::decline_quote)),
    );

    // ── Contract routes ──
    cfg.service(
        web::scope("/contracts")
            .route("", web::post().to(contracts::create_contract))
            .route(
                "/company/pending",
                web::get().to(contracts::get_pending_for_company),
            )
            .route(
                "/company/projects",
                web::get().to(contracts::get_projects_for_company),
            )
            .route(
                "/client/pending",
                web::get().to(contracts::get_pending_for_client),
            )
            .route(
                "/client/accepted",
                web::get().to(contracts::get_accepted_for_client),
            )
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}/accept", web::post().to(contracts::accept_contract))
            .route("/{id}/decline", web::post().to(contracts::decline_contract)),
    );

    // ── Payment routes ──
    cfg.service(
        web::scope("/payments")
            .route("/esewa/initiate", web::post().to(payments::esewa_initiate))
            .route("/esewa/verify", web::post().to(payments::esewa_verify))
            .route("/stripe/intent", web::post().to(payments::stripe_intent))
            .route("/stripe/verify", web::post().to(payments::stripe_verify))
            .route(
                "/contract/{contract_id}",
                web::get().to(payments::get_payments_for_contract),
            ),
    );
}
