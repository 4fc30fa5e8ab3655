//! Configuration: settings file and session store

mod settings;
mod types;

pub use settings::{
    clear_session, config_dir, load_session, load_settings, save_session, session_path,
};
pub use types::{ApiSettings, BehaviorSettings, Settings, ThemeVariant, UiSettings};
