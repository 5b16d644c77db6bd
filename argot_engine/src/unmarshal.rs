mod codec;
mod core;

pub use self::codec::*;
pub use self::core::*;
