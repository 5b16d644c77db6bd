use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use thiserror::Error;

use crate::constant::*;

/// A failure to convert a raw string into its destination.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnmarshalError {
    /// The raw string does not fit the syntax (or range) of the destination type.
    #[error("cannot convert '{raw}' to {type_name}: {reason}.")]
    Format {
        /// The offending raw string.
        raw: String,
        /// The destination type.
        type_name: &'static str,
        /// What went wrong.
        reason: String,
    },
    /// A custom codec rejected the raw string.
    #[error("cannot decode '{raw}': {message}.")]
    Codec {
        /// The offending raw string.
        raw: String,
        /// The codec's explanation.
        message: String,
    },
}

impl UnmarshalError {
    /// Build a [`UnmarshalError::Format`] for the destination type `T`.
    pub fn format<T: ?Sized>(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        UnmarshalError::Format {
            raw: raw.into(),
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// Build a [`UnmarshalError::Codec`].
    pub fn codec(raw: impl Into<String>, message: impl Into<String>) -> Self {
        UnmarshalError::Codec {
            raw: raw.into(),
            message: message.into(),
        }
    }
}

/// Behaviour to convert a (non-empty) raw string into `Self`, in place.
///
/// Implemented for the closed set of destination kinds: strings, integers, floats, booleans, [`Vec`]s, maps, and the pointer-like [`Box`]/[`Option`].
/// Custom codecs implement this directly; they may ignore the [`Unmarshaler`] configuration.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Unmarshal, UnmarshalError, Unmarshaler};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point(i32, i32);
///
/// impl Unmarshal for Point {
///     fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
///         let (x, y) = raw
///             .split_once(',')
///             .ok_or_else(|| UnmarshalError::codec(raw, "expected 'x,y'"))?;
///         unmarshaler.unmarshal(x, &mut self.0)?;
///         unmarshaler.unmarshal(y, &mut self.1)
///     }
/// }
///
/// let mut point = Point::default();
/// Unmarshaler::default().unmarshal("3,-0x4", &mut point).unwrap();
/// assert_eq!(point, Point(3, -4));
/// ```
pub trait Unmarshal {
    /// Convert `raw` into this destination.
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError>;

    /// Whether the destination is boolean-shaped, in which case the mere presence of a flag means `true`.
    fn is_boolean() -> bool
    where
        Self: Sized,
    {
        false
    }
}

/// Marker for destinations that may be collected into a [`Vec`] or used as a map key/value.
///
/// Requires [`Default`] so that each new element can be created before being unmarshaled into.
pub trait Item: Unmarshal + Default {}

/// The configurable conversion engine.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::Unmarshaler;
///
/// let unmarshaler = Unmarshaler::default().with_hex_leaders(["#"]);
/// let mut value: u8 = 0;
/// unmarshaler.unmarshal("#ff", &mut value).unwrap();
/// assert_eq!(value, 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmarshaler {
    hex_leaders: Vec<String>,
    octal_leaders: Vec<String>,
    separators: Vec<char>,
}

impl Default for Unmarshaler {
    fn default() -> Self {
        Self {
            hex_leaders: HEX_LEADERS.iter().map(|l| l.to_string()).collect(),
            octal_leaders: OCTAL_LEADERS.iter().map(|l| l.to_string()).collect(),
            separators: KEY_VALUE_SEPARATORS.to_vec(),
        }
    }
}

impl Unmarshaler {
    /// Replace the leaders that mark a hexadecimal integer.
    pub fn with_hex_leaders(mut self, leaders: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.hex_leaders = leaders.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the leaders that mark an octal integer.
    pub fn with_octal_leaders(
        mut self,
        leaders: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.octal_leaders = leaders.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the characters that separate a map key from its value.
    pub fn with_separators(mut self, separators: impl IntoIterator<Item = char>) -> Self {
        self.separators = separators.into_iter().collect();
        self
    }

    /// Unmarshal `raw` into the destination.
    /// An empty `raw` is a no-op which leaves the destination untouched.
    pub fn unmarshal<T: Unmarshal + ?Sized>(
        &self,
        raw: &str,
        destination: &mut T,
    ) -> Result<(), UnmarshalError> {
        if raw.is_empty() {
            return Ok(());
        }

        destination.unmarshal(raw, self)
    }

    /// Parse an integer, detecting the radix from its leader (after the sign, if `signed`).
    /// When `radix` is forced, a matching leader is optional.
    pub(crate) fn integer(
        &self,
        raw: &str,
        signed: bool,
        radix: Option<u32>,
    ) -> Result<i128, String> {
        let (negative, body) = match raw.strip_prefix('-') {
            Some(rest) if signed => (true, rest),
            _ if signed => (false, raw.strip_prefix('+').unwrap_or(raw)),
            _ => (false, raw),
        };

        let (radix, digits) = match radix {
            Some(16) => (16, strip_leader(body, &self.hex_leaders).unwrap_or(body)),
            Some(8) => (8, strip_leader(body, &self.octal_leaders).unwrap_or(body)),
            Some(radix) => (radix, body),
            None => self.detect_radix(body),
        };

        if !digits.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err("invalid digits".to_string());
        }

        let magnitude = u128::from_str_radix(digits, radix)
            .map_err(|error| error.to_string())
            .and_then(|m| i128::try_from(m).map_err(|error| error.to_string()))?;

        Ok(if negative { -magnitude } else { magnitude })
    }

    fn detect_radix<'r>(&self, body: &'r str) -> (u32, &'r str) {
        if let Some(digits) = strip_leader(body, &self.hex_leaders) {
            (16, digits)
        } else if let Some(digits) = strip_leader(body, &self.octal_leaders) {
            (8, digits)
        } else {
            (10, body)
        }
    }

    /// Split a map entry on the first occurrence of any separator.
    pub(crate) fn split_entry<'r>(&self, raw: &'r str) -> Option<(&'r str, &'r str)> {
        let index = raw.find(|c: char| self.separators.contains(&c))?;
        let separator = raw[index..].chars().next()?;
        Some((&raw[..index], &raw[index + separator.len_utf8()..]))
    }
}

// The longest matching leader wins.
fn strip_leader<'r>(body: &'r str, leaders: &[String]) -> Option<&'r str> {
    leaders
        .iter()
        .filter(|leader| !leader.is_empty() && body.starts_with(leader.as_str()))
        .max_by_key(|leader| leader.len())
        .map(|leader| &body[leader.len()..])
}

impl Unmarshal for String {
    fn unmarshal(&mut self, raw: &str, _unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        *self = raw.to_string();
        Ok(())
    }
}

impl Item for String {}

macro_rules! unmarshal_integer {
    ($signed:expr; $($t:ty),*) => {
        $(
            impl Unmarshal for $t {
                fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
                    let value = unmarshaler
                        .integer(raw, $signed, None)
                        .map_err(|reason| UnmarshalError::format::<$t>(raw, reason))?;
                    *self = <$t>::try_from(value)
                        .map_err(|_| UnmarshalError::format::<$t>(raw, "out of range"))?;
                    Ok(())
                }
            }

            impl Item for $t {}
        )*
    };
}

unmarshal_integer!(true; i8, i16, i32, i64, isize);
unmarshal_integer!(false; u8, u16, u32, u64, usize);

macro_rules! unmarshal_float {
    ($($t:ty),*) => {
        $(
            impl Unmarshal for $t {
                fn unmarshal(&mut self, raw: &str, _unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
                    *self = raw
                        .parse::<$t>()
                        .map_err(|error| UnmarshalError::format::<$t>(raw, error.to_string()))?;
                    Ok(())
                }
            }

            impl Item for $t {}
        )*
    };
}

unmarshal_float!(f32, f64);

// Whether the text belongs to either boolean vocabulary.
pub(crate) fn is_boolean_word(raw: &str) -> bool {
    TRUE_WORDS
        .iter()
        .chain(FALSE_WORDS.iter())
        .any(|w| w.eq_ignore_ascii_case(raw))
}

impl Unmarshal for bool {
    fn unmarshal(&mut self, raw: &str, _unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(raw)) {
            *self = true;
        } else if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(raw)) {
            *self = false;
        } else {
            return Err(UnmarshalError::format::<bool>(
                raw,
                "expected one of true/t/yes/y/on/1 or false/f/no/n/off/0",
            ));
        }

        Ok(())
    }

    fn is_boolean() -> bool {
        true
    }
}

impl Item for bool {}

impl<T: Unmarshal> Unmarshal for Box<T> {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        (**self).unmarshal(raw, unmarshaler)
    }

    fn is_boolean() -> bool {
        T::is_boolean()
    }
}

impl<T: Item> Item for Box<T> {}

impl<T: Unmarshal + Default> Unmarshal for Option<T> {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        match self {
            Some(inner) => inner.unmarshal(raw, unmarshaler),
            None => {
                let mut inner = T::default();
                inner.unmarshal(raw, unmarshaler)?;
                self.replace(inner);
                Ok(())
            }
        }
    }

    fn is_boolean() -> bool {
        T::is_boolean()
    }
}

impl<T: Item> Item for Option<T> {}

impl<T: Item> Unmarshal for Vec<T> {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        let mut item = T::default();
        item.unmarshal(raw, unmarshaler)?;
        self.push(item);
        Ok(())
    }

    fn is_boolean() -> bool {
        T::is_boolean()
    }
}

fn unmarshal_entry<K: Item, V: Item>(
    raw: &str,
    unmarshaler: &Unmarshaler,
) -> Result<(K, V), UnmarshalError> {
    let (raw_key, raw_value) = unmarshaler.split_entry(raw).ok_or_else(|| {
        UnmarshalError::format::<(K, V)>(raw, "missing a key/value separator")
    })?;
    let mut key = K::default();
    unmarshaler.unmarshal(raw_key, &mut key)?;
    let mut value = V::default();
    unmarshaler.unmarshal(raw_value, &mut value)?;
    Ok((key, value))
}

impl<K: Item + Eq + Hash, V: Item> Unmarshal for HashMap<K, V> {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        let (key, value) = unmarshal_entry(raw, unmarshaler)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K: Item + Ord, V: Item> Unmarshal for BTreeMap<K, V> {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        let (key, value) = unmarshal_entry(raw, unmarshaler)?;
        self.insert(key, value);
        Ok(())
    }
}
