pub mod recorder;

pub use fake_channel::*;
pub use handshake::*;
pub use recorder::*;
