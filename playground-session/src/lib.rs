mod error;
mod registry;
mod session;
mod signaling;
mod transport;

pub use error::*;
pub use registry::*;
pub use session::*;
pub use signaling::*;
pub use transport::*;
