mod base;
mod printer;

pub use self::base::*;
pub use self::printer::*;
