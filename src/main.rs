use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use bidwork_backend::auth::jwks::JwksCache;
use bidwork_backend::create_pool;
use bidwork_backend::gateways::{EsewaClient, StripeClient};
use bidwork_backend::handlers;
use bidwork_backend::services::documents::DocumentRenderer;
use bidwork_backend::services::notify::Notifier;
use dotenv::dotenv;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let db = create_pool().await;
    let db_data = web::Data::new(db);

    let supabase_url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set");
    let project_ref = supabase_url
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .expect("Invalid SUPABASE_URL format. Expected: https://PROJECT.supabase.co");

    let supabase_anon_key =
        std::env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY must be set");
    let jwks_cache = web::Data::new(Arc::new(JwksCache::new(project_ref, &supabase_anon_key)));

    // External collaborators, injected as app data so handlers (and tests)
    // never reach for globals.
    let esewa = web::Data::new(EsewaClient::from_env());
    let stripe = web::Data::new(StripeClient::from_env());
    let notifier = web::Data::new(Notifier::from_env());
    let renderer = web::Data::new(DocumentRenderer::from_env());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{port}");
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(jwks_cache.clone())
            .app_data(esewa.clone())
            .app_data(stripe.clone())
            .app_data(notifier.clone())
            .app_data(renderer.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
