mod codec;
mod outbound;

pub use codec::*;
pub use outbound::*;
