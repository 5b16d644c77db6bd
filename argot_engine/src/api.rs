mod binding;
mod core;
mod declare;

pub use self::binding::*;
pub use self::core::*;
pub use self::declare::*;
