mod callbacks;
mod dispatcher;
mod event_loop;
mod session_config;
mod session_controller;

pub use callbacks::*;
pub use dispatcher::*;
pub use session_config::*;
pub use session_controller::*;
