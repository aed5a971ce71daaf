pub mod api;
pub mod config;
pub mod db;
pub mod editor;
pub mod export;
pub mod models;
pub mod service;

pub use config::{AppConfig, EditorConfig};
pub use db::create_pool;
pub use service::QuotationService;
