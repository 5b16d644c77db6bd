//! `argot` is a declarative, type-directed command line parser for Rust.
//!
//! Declare flags and positional arguments, bind each one to a variable, then parse.
//! Every matched value is converted according to the type of the variable it is bound to.
//! `argot` attempts to prioritize the following design concerns:
//! * *Type directed conversion*:
//! The user should not call any `&str -> T` conversion functions directly.
//! Integers (with `0x`/`0o` radix leaders), floats, booleans, vectors, maps and custom codecs all work out of the box.
//! * *Familiar flag syntax*:
//! Short flags chain (`-abc`), take attached values (`-ofile`, `-o=file`) or disconnected ones (`-o file`).
//! Long flags take `--name=value` or `--name value`.
//! A lone `--` ends flag interpretation; everything after it is passed through untouched.
//! * *Complete error reports*:
//! Every unmet requirement (required flags, flag arguments and positional arguments) is reported together, rather than one at a time.
//! * *Sub-command trees*:
//! Commands may nest arbitrarily, with flags inherited by every descendant.
//!
//! # Usage
//! ```
//! use argot::{Argument, Binding, Command, DefaultValue, Flag};
//!
//! let mut verbose = false;
//! let mut level: u8 = 0;
//! let mut items: Vec<u32> = Vec::default();
//! let command = Command::build("summer")
//!     .about("Sums the items.")
//!     .flag(Flag::new().short('v').long("verbose").argument(Argument::new().bind(Binding::new(&mut verbose))))
//!     .flag(
//!         Flag::new().short('l').long("level").argument(
//!             Argument::named("LEVEL")
//!                 .required()
//!                 .bind(Binding::new(&mut level).default_value(DefaultValue::Literal(1))),
//!         ),
//!     )
//!     .argument(Argument::named("ITEM").required().bind(Binding::new(&mut items)))
//!     .finish()
//!     .unwrap();
//!
//! let parsed = command.parse(&["summer", "-l0x3", "-v", "7", "--", "ignored"]).unwrap();
//! assert_eq!(parsed.passthrough(), &["ignored"]);
//! drop(command);
//!
//! assert!(verbose);
//! assert_eq!(level, 3);
//! assert_eq!(items, vec![7]);
//! ```
//!
//! # Flags & Arguments
//! A [`Flag`] has a short name, a long name, or both.
//! It may take an [`Argument`], which is either required (the next token is always consumed, even if it looks like a flag) or optional.
//!
//! An optional argument never steals a known flag: given `-a` with an optional argument and `-b` without one, `-ab` hits both flags.
//! Likewise `-a -b` leaves `-a` without a value.
//!
//! Boolean destinations (`bool`, and containers of it) treat the bare presence of the flag as `true`.
//! An optional boolean argument only takes the next token when it is a boolean word such as `yes` or `off`, so `-v file.txt` leaves `file.txt` for the positionals.
//!
//! Positional arguments are filled in declaration order.
//! Tokens which match nothing are collected in [`Parsed::unmapped`] rather than failing the parse.
//!
//! # Values
//! Conversion is driven by the [`Unmarshal`] trait.
//! Implement it to bind your own types; see [`Hex`], [`Octal`] and [`Bytes`] for the provided codecs.
//! Defaults are declared on the [`Binding`] via [`DefaultValue`], and apply only when the argument is never matched.
//!
//! # Sub-commands
//! ```
//! use argot::{Argument, Binding, CommandTree, Flag, Node, ParseError};
//!
//! let mut name = String::default();
//! let tree = CommandTree::build("git")
//!     .flag(Flag::new().short('v').long("verbose"))
//!     .child(Node::leaf("status"))
//!     .child(Node::branch("remote").child(
//!         Node::leaf("add").argument(Argument::named("NAME").required().bind(Binding::new(&mut name))),
//!     ))
//!     .finish()
//!     .unwrap();
//!
//! let parsed = tree.parse(&["-v", "remote", "add", "origin"]).unwrap();
//! assert_eq!(parsed.path(), &["remote", "add"]);
//!
//! match tree.parse(&["fetch"]) {
//!     Err(ParseError::UnrecognizedSubCommand(name)) => assert_eq!(name, "fetch"),
//!     _ => unreachable!(),
//! }
//! ```
pub use argot_engine::*;
