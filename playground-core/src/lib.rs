pub mod error;
pub mod model;
pub mod settings;

pub use error::ProtocolError;
pub use model::*;
pub use settings::{GameSettings, InputAction, Keybinds, SettingsState};
