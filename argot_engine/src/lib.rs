//! Engine module for `argot`.
//! See the `argot` crate root for an overview of the parsing pipeline.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod parser;
#[allow(missing_docs)]
pub mod prelude;
mod tokens;
mod unmarshal;

pub use api::*;
pub use matcher::{ArgumentId, ArgumentState, FlagId, FlagState, NodeId, Parsed};
pub use parser::{ConfigError, Missing, MissingRequirements, ParseError, Printer};
pub use tokens::{Classifier, Element, Emitter, LexicalEvent};
pub use unmarshal::*;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
