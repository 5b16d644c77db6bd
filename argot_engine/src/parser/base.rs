use thiserror::Error;

use crate::api::DefaultError;
use crate::unmarshal::UnmarshalError;

/// A malformed declaration, caught when building a command (before any parsing).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config error: a flag must declare a short or long name.")]
    /// A flag with neither a short nor a long name.
    MissingIdentifier,

    #[error("Config error: invalid short flag '{0}' (must be a single alphanumeric character).")]
    /// A short name which is not alphanumeric.
    InvalidShort(char),

    #[error("Config error: invalid long flag '{0}' (must start alphanumeric, then contain only alphanumerics, '-' or '_').")]
    /// A long name with a bad character.
    InvalidLong(String),

    #[error("Config error: cannot duplicate the short flag '-{0}'.")]
    /// Two reachable flags share a short name.
    DuplicateShort(char),

    #[error("Config error: cannot duplicate the long flag '--{0}'.")]
    /// Two reachable flags share a long name.
    DuplicateLong(String),

    #[error("Config error: cannot duplicate the sub-command '{0}'.")]
    /// Two children of one branch share a name.
    DuplicateSubCommand(String),

    #[error("Config error: invalid sub-command name '{0}'.")]
    /// A child name which could never be matched as plain text.
    InvalidSubCommand(String),

    #[error("Config error: {0}")]
    /// A declaration added to a node which cannot hold it (ex: a positional argument on a branch).
    Misplaced(String),
}

/// One unmet requirement, detected once the input is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// A required flag was never hit.
    Flag(String),
    /// A flag was hit, but its required argument was never filled.
    FlagArgument(String),
    /// A required positional argument was never filled.
    Argument {
        /// The argument's name, if declared.
        name: Option<String>,
        /// The argument's 1-based position.
        position: usize,
    },
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Missing::Flag(flag) => write!(f, "required flag '{flag}' was not provided"),
            Missing::FlagArgument(flag) => write!(f, "flag '{flag}' requires an argument"),
            Missing::Argument {
                name: Some(name), ..
            } => write!(f, "required argument '{name}' was not provided"),
            Missing::Argument {
                name: None,
                position,
            } => write!(f, "required argument #{position} was not provided"),
        }
    }
}

/// Every unmet requirement of a single parse, reported at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRequirements(pub Vec<Missing>);

impl MissingRequirements {
    /// Iterate over the unmet requirements.
    pub fn iter(&self) -> impl Iterator<Item = &Missing> {
        self.0.iter()
    }

    /// The number of unmet requirements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether every requirement was met.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for MissingRequirements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}.", messages.join("; "))
    }
}

impl std::error::Error for MissingRequirements {}

/// The failure of a parse.
///
/// Only [`ParseError::Missing`] is aggregated; every other variant aborts the parse as soon as it is encountered.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error: unrecognized sub-command '{0}'.")]
    /// Plain text at a branch which names none of its children.
    UnrecognizedSubCommand(String),

    #[error("Parse error: {target}: {source}")]
    /// A matched value could not be converted into its destination.
    Format {
        /// The flag or argument being filled.
        target: String,
        /// The conversion failure.
        source: UnmarshalError,
    },

    #[error("Parse error: flag '{flag}' does not take a value (given '{value}').")]
    /// An explicit `=value` for a flag without an argument.
    UnexpectedValue {
        /// The flag.
        flag: String,
        /// The stray value.
        value: String,
    },

    #[error("Parse error: default for '{target}' failed: {source}")]
    /// A default could not be produced.
    Default {
        /// The flag or argument being defaulted.
        target: String,
        /// The provider's (or conversion's) error.
        source: DefaultError,
    },

    #[error("Parse error: {0}")]
    /// Unmet requirements.
    Missing(#[from] MissingRequirements),
}
