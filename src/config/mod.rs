pub mod files;
pub mod settings;

pub use files::{default_config_path, log_file};
pub use settings::{init_config, load_settings, save_settings, Settings};
