#![allow(dead_code)]

pub mod app_builder;
pub mod tokens;

pub use app_builder::create_test_app;
pub use backend_stub::BackendStub;
