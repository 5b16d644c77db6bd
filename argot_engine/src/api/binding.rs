use std::cell::RefCell;

use crate::unmarshal::{Unmarshal, UnmarshalError, Unmarshaler};

/// The error a fallible default provider may return; propagated verbatim by the parse.
pub type DefaultError = Box<dyn std::error::Error + Send + Sync>;

/// Behaviour to capture raw values into a destination, with its type `T` erased.
///
/// We use this at the middle/top of the declaration graph so that destinations of different types may all live in a single command.
pub trait AnonymousBinding {
    /// Capture a (non-empty) raw value into the destination.
    fn capture(&self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError>;

    /// Whether the destination is boolean-shaped (flag presence alone means `true`).
    fn is_boolean(&self) -> bool;

    /// Write the default value (if any) into the destination.
    fn apply_default(&self, unmarshaler: &Unmarshaler) -> Result<(), DefaultError>;

    /// The name of the destination type.
    fn type_name(&self) -> &'static str;
}

type Resolver<'a, T> = Box<dyn Fn(&Unmarshaler) -> Result<T, DefaultError> + 'a>;

/// A typed destination for an [`Argument`](crate::Argument).
///
/// The conversion of the raw string is selected at compile time through `T`'s [`Unmarshal`] implementation.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Argument, Binding, Command, DefaultValue, Flag};
///
/// let mut level: u8 = 0;
/// let command = Command::build("program")
///     .flag(
///         Flag::new().short('l').argument(
///             Argument::named("LEVEL")
///                 .bind(Binding::new(&mut level).default_value(DefaultValue::Literal(3))),
///         ),
///     )
///     .finish()
///     .unwrap();
///
/// command.parse(&["program"]).unwrap();
/// drop(command);
/// assert_eq!(level, 3);
/// ```
pub struct Binding<'a, T> {
    variable: RefCell<&'a mut T>,
    default: Option<Resolver<'a, T>>,
}

impl<'a, T: Unmarshal> Binding<'a, T> {
    /// Create a binding onto the variable.
    pub fn new(variable: &'a mut T) -> Self {
        Self {
            variable: RefCell::new(variable),
            default: None,
        }
    }
}

impl<'a, T> Binding<'a, T>
where
    T: Unmarshal + Default + Clone + 'a,
{
    /// Declare the value to write when the argument is never matched.
    /// If repeated, only the final default will apply.
    pub fn default_value(mut self, default: DefaultValue<T>) -> Self {
        self.default
            .replace(Box::new(move |unmarshaler: &Unmarshaler| {
                default.resolve(unmarshaler)
            }));
        self
    }
}

impl<'a, T> std::fmt::Debug for Binding<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("type", &std::any::type_name::<T>())
            .field("default", &self.default.is_some())
            .finish()
    }
}

impl<'a, T: Unmarshal> AnonymousBinding for Binding<'a, T> {
    fn capture(&self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        unmarshaler.unmarshal(raw, &mut **self.variable.borrow_mut())
    }

    fn is_boolean(&self) -> bool {
        T::is_boolean()
    }

    fn apply_default(&self, unmarshaler: &Unmarshaler) -> Result<(), DefaultError> {
        if let Some(resolve) = &self.default {
            let value = resolve(unmarshaler)?;
            **self.variable.borrow_mut() = value;
        }

        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// The value of an argument which was never matched in the input.
pub enum DefaultValue<T> {
    /// Assigned as is.
    Literal(T),
    /// Run through the unmarshaler as if it were raw input.
    Text(String),
    /// Called once per parse.
    Provider(Box<dyn Fn() -> T>),
    /// Called once per parse; an error aborts the parse.
    FallibleProvider(Box<dyn Fn() -> Result<T, DefaultError>>),
}

impl<T> DefaultValue<T>
where
    T: Unmarshal + Default + Clone,
{
    /// A textual default.
    pub fn text(raw: impl Into<String>) -> Self {
        DefaultValue::Text(raw.into())
    }

    /// A provider default.
    pub fn provider(provider: impl Fn() -> T + 'static) -> Self {
        DefaultValue::Provider(Box::new(provider))
    }

    /// A provider default which may fail.
    pub fn fallible<E>(provider: impl Fn() -> Result<T, E> + 'static) -> Self
    where
        E: Into<DefaultError>,
    {
        DefaultValue::FallibleProvider(Box::new(move || provider().map_err(Into::into)))
    }

    /// A provider default whose value is adapted into `T`.
    /// For example, a provider of `u16` for a [`Hex<u16>`](crate::Hex) destination.
    pub fn provider_into<U>(provider: impl Fn() -> U + 'static) -> Self
    where
        U: Into<T>,
    {
        DefaultValue::Provider(Box::new(move || provider().into()))
    }

    /// Produce the default value.
    pub fn resolve(&self, unmarshaler: &Unmarshaler) -> Result<T, DefaultError> {
        match self {
            DefaultValue::Literal(value) => Ok(value.clone()),
            DefaultValue::Text(raw) => {
                let mut value = T::default();
                unmarshaler.unmarshal(raw, &mut value)?;
                Ok(value)
            }
            DefaultValue::Provider(provider) => Ok(provider()),
            DefaultValue::FallibleProvider(provider) => provider(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DefaultValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Text(raw) => f.debug_tuple("Text").field(raw).finish(),
            DefaultValue::Provider(_) => f.write_str("Provider(..)"),
            DefaultValue::FallibleProvider(_) => f.write_str("FallibleProvider(..)"),
        }
    }
}
