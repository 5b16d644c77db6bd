//! Traits which, typically, may be imported without concern: `use argot::prelude::*`.

pub use crate::api::AnonymousBinding;
pub use crate::unmarshal::{Item, Unmarshal};
