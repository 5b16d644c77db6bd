mod element;
mod emitter;

pub use self::element::*;
pub use self::emitter::*;
