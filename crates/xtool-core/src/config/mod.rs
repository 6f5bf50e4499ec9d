//! Settings loading and deploy directory layout

pub mod layout;
pub mod settings;

pub use layout::DeployLayout;
pub use settings::{MatchSettings, Settings, SETTINGS_FILE_NAME};
