use actix_web::{web, App, HttpServer};
use frontend::config::Config;
use frontend::middleware::{
    RequestTrace, SecurityHeaders, SessionResolver, StructuredLogger, TraceSpan,
};
use frontend::routes;
use frontend::state::builder::build_state;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Local development may keep settings in .env; deployments set them directly.
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;
    println!("🚀 Starting job portal front-end on http://{}:{}", host, port);
    println!("🔗 Backend API at {}", config.api_base_url);

    let app_state = match build_state().with_config(config).build() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let cookies = app_state.cookies;
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(SessionResolver::new(cookies))
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
