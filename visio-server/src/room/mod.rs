mod room;
mod room_coordinator;

pub use room::*;
pub use room_coordinator::*;
