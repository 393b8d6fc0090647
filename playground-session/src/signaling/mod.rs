mod signaling_exchange;

pub use signaling_exchange::*;
