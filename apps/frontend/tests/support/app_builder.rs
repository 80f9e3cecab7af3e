use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use frontend::middleware::{
    RequestTrace, SecurityHeaders, SessionResolver, StructuredLogger, TraceSpan,
};
use frontend::routes;
use frontend::state::app_state::AppState;
use frontend::views::PageRenderer;

/// Builds an actix test service wired the way `main.rs` wires the server.
pub struct TestAppBuilder {
    state: AppState,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Swap the page renderer, e.g. for one that always fails.
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.state.renderer = renderer;
        self
    }

    pub async fn build(
        self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
        let cookies = self.state.cookies;
        let data = web::Data::new(self.state);

        test::init_service(
            App::new()
                .wrap(SessionResolver::new(cookies))
                .wrap(SecurityHeaders)
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(data)
                .configure(routes::configure),
        )
        .await
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
