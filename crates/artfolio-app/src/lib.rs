//! Artfolio Application
//!
//! The host shell around the canvas: configuration loading, the profile
//! header that opens and saves the editor, and scripted event replay.

mod config;
mod error;
mod host;
pub mod replay;

pub use config::{AppConfig, CONFIG_FILE_NAME, default_config_path};
pub use error::{AppError, AppResult};
pub use host::{HostError, HostResult, WhiteboardHeader};
pub use replay::{ReplayReport, load_script, parse_script, replay};
