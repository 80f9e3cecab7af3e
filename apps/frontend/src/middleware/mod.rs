pub mod guard;
pub mod request_trace;
pub mod security_headers;
pub mod session;
pub mod structured_logger;
pub mod trace_span;

pub use guard::RequireAccess;
pub use request_trace::RequestTrace;
pub use security_headers::SecurityHeaders;
pub use session::SessionResolver;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
