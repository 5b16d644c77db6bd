use crate::api::{AnonymousBinding, Binding};
use crate::unmarshal::Unmarshal;

/// A value slot: either a flag's argument or a positional argument.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Argument, Binding};
///
/// let mut file = String::default();
/// let argument = Argument::named("FILE")
///     .description("The file to read.")
///     .required()
///     .bind(Binding::new(&mut file));
/// assert_eq!(argument.name(), Some("FILE"));
/// assert!(argument.is_required());
/// ```
#[derive(Default)]
pub struct Argument<'a> {
    name: Option<String>,
    description: Option<String>,
    required: bool,
    binding: Option<Box<dyn AnonymousBinding + 'a>>,
}

impl<'a> Argument<'a> {
    /// Create an anonymous, optional argument.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a named, optional argument.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Document the argument.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Require the argument to be filled.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Bind the argument to a typed destination.
    /// If repeated, only the final binding will apply.
    pub fn bind<T: Unmarshal + 'a>(self, binding: Binding<'a, T>) -> Self {
        self.bind_anonymous(binding)
    }

    /// Bind the argument to any destination.
    pub fn bind_anonymous(mut self, binding: impl AnonymousBinding + 'a) -> Self {
        self.binding.replace(Box::new(binding));
        self
    }

    /// The name of the argument.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The description of the argument.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the argument must be filled.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn binding(&self) -> Option<&(dyn AnonymousBinding + 'a)> {
        self.binding.as_deref()
    }

    pub(crate) fn is_boolean(&self) -> bool {
        self.binding().map_or(false, |binding| binding.is_boolean())
    }

    // The text used for this argument in help & error messages.
    pub(crate) fn hint(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .binding()
                .map_or("VALUE", |binding| short_type_name(binding.type_name()))
                .to_ascii_uppercase(),
        }
    }
}

impl<'a> std::fmt::Debug for Argument<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("binding", &self.binding().map(|b| b.type_name()))
            .finish()
    }
}

fn short_type_name(type_name: &str) -> &str {
    let head = type_name.split('<').next().unwrap_or(type_name);
    head.rsplit("::").next().unwrap_or(head)
}

/// How many values a flag takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    Nothing,
    Optional,
    Required,
}

/// A flag: `-s`, `--long`, or both.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Argument, Binding, Flag};
///
/// let mut names: Vec<String> = Vec::default();
/// let flag = Flag::new()
///     .short('n')
///     .long("name")
///     .description("A name to greet (repeatable).")
///     .argument(Argument::named("NAME").required().bind(Binding::new(&mut names)));
/// assert_eq!(flag.display_name(), "--name");
/// ```
#[derive(Default)]
pub struct Flag<'a> {
    short: Option<char>,
    long: Option<String>,
    description: Option<String>,
    required: bool,
    argument: Option<Argument<'a>>,
    on_hit: Option<Box<dyn Fn() + 'a>>,
}

impl<'a> Flag<'a> {
    /// Create a flag; at least one of [`Flag::short`] and [`Flag::long`] must be declared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the short (single alphanumeric character) name.
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// Declare the long name.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long.replace(long.into());
        self
    }

    /// Document the flag.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Require the flag to be present.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Give the flag an argument; whether the argument is required decides how greedily values are taken.
    pub fn argument(mut self, argument: Argument<'a>) -> Self {
        self.argument.replace(argument);
        self
    }

    /// Invoke the callback every time the flag is hit.
    pub fn on_hit(mut self, callback: impl Fn() + 'a) -> Self {
        self.on_hit.replace(Box::new(callback));
        self
    }

    /// The short name.
    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    /// The long name.
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The name used in messages: `--long` when available, otherwise `-s`.
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => String::default(),
        }
    }

    /// The description of the flag.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the flag must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The flag's argument, if any.
    pub fn get_argument(&self) -> Option<&Argument<'a>> {
        self.argument.as_ref()
    }

    pub(crate) fn arity(&self) -> Arity {
        match &self.argument {
            None => Arity::Nothing,
            Some(argument) if argument.is_required() => Arity::Required,
            Some(_) => Arity::Optional,
        }
    }

    pub(crate) fn notify(&self) {
        if let Some(callback) = &self.on_hit {
            callback();
        }
    }
}

impl<'a> std::fmt::Debug for Flag<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flag")
            .field("short", &self.short)
            .field("long", &self.long)
            .field("required", &self.required)
            .field("argument", &self.argument)
            .finish()
    }
}

/// A named collection of flags; purely organizational (ex: help sections).
#[derive(Debug)]
pub struct FlagGroup<'a> {
    name: String,
    flags: Vec<Flag<'a>>,
}

impl<'a> FlagGroup<'a> {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: Vec::default(),
        }
    }

    /// Add a flag to the group.
    pub fn flag(mut self, flag: Flag<'a>) -> Self {
        self.flags.push(flag);
        self
    }

    /// The name of the group.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn push(&mut self, flag: Flag<'a>) {
        self.flags.push(flag);
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Flag<'a>>) {
        (self.name, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[test]
    fn argument_defaults() {
        let argument = Argument::new();
        assert_eq!(argument.name(), None);
        assert!(!argument.is_required());
        assert!(argument.binding().is_none());
        assert!(!argument.is_boolean());
        assert_eq!(argument.hint(), "VALUE");
    }

    #[test]
    fn argument_hint() {
        let mut variable: Vec<u32> = Vec::default();
        let argument = Argument::new().bind(Binding::new(&mut variable));
        assert_eq!(argument.hint(), "VEC");

        let mut variable = false;
        let argument = Argument::named("switch").bind(Binding::new(&mut variable));
        assert_eq!(argument.hint(), "switch");
        assert!(argument.is_boolean());
    }

    #[rstest]
    #[case(Flag::new(), Arity::Nothing)]
    #[case(Flag::new().argument(Argument::new()), Arity::Optional)]
    #[case(Flag::new().argument(Argument::new().required()), Arity::Required)]
    fn flag_arity(#[case] flag: Flag, #[case] expected: Arity) {
        assert_eq!(flag.arity(), expected);
    }

    #[rstest]
    #[case(Flag::new().short('a'), "-a")]
    #[case(Flag::new().long("all"), "--all")]
    #[case(Flag::new().short('a').long("all"), "--all")]
    #[case(Flag::new(), "")]
    fn flag_display_name(#[case] flag: Flag, #[case] expected: &str) {
        assert_eq!(flag.display_name(), expected);
    }

    #[test]
    fn flag_notify() {
        let hits = Cell::new(0);
        let flag = Flag::new().short('v').on_hit(|| hits.set(hits.get() + 1));
        flag.notify();
        flag.notify();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn group_parts() {
        let mut group = FlagGroup::new("output").flag(Flag::new().short('q'));
        group.push(Flag::new().short('v'));
        assert_eq!(group.name(), "output");
        let (name, flags) = group.into_parts();
        assert_eq!(name, "output");
        assert_eq!(
            flags.iter().map(|f| f.short_name()).collect::<Vec<_>>(),
            vec![Some('q'), Some('v')]
        );
    }
}
