pub mod api;
pub mod app;
pub mod client_ip;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod redirect;
pub mod service;
pub mod storage;
pub mod validation;

pub use error::{ShortenerError, ShortenerResult};
pub use service::UrlService;
