pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, StorageConfig, TmdbConfig, ToastConfig, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_LANGUAGE};
pub use paths::{PathManager, base_path_override};
