use crate::unmarshal::{Item, Unmarshal, UnmarshalError, Unmarshaler};

/// A byte-slice destination: takes the raw string's bytes verbatim.
///
/// Use `Vec<Bytes>` to accumulate one payload per occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Unmarshal for Bytes {
    fn unmarshal(&mut self, raw: &str, _unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        self.0 = raw.as_bytes().to_vec();
        Ok(())
    }
}

impl Item for Bytes {}

/// Integer destinations usable inside the fixed-radix codecs.
pub trait Integer: Copy + Default + TryFrom<i128> {
    /// Whether a leading sign is accepted.
    const SIGNED: bool;
}

macro_rules! integer {
    ($signed:expr; $($t:ty),*) => {
        $(
            impl Integer for $t {
                const SIGNED: bool = $signed;
            }
        )*
    };
}

integer!(true; i8, i16, i32, i64, isize);
integer!(false; u8, u16, u32, u64, usize);

fn fixed_radix<T: Integer>(
    raw: &str,
    radix: u32,
    unmarshaler: &Unmarshaler,
) -> Result<T, UnmarshalError> {
    let value = unmarshaler
        .integer(raw, T::SIGNED, Some(radix))
        .map_err(|reason| UnmarshalError::format::<T>(raw, reason))?;
    T::try_from(value).map_err(|_| UnmarshalError::format::<T>(raw, "out of range"))
}

/// An integer which is always read in base 16; the hex leader is optional.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Hex, Unmarshaler};
///
/// let mut value: Hex<u16> = Hex::default();
/// Unmarshaler::default().unmarshal("ff", &mut value).unwrap();
/// assert_eq!(value.0, 255);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hex<T>(pub T);

impl<T: Integer> Unmarshal for Hex<T> {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        self.0 = fixed_radix(raw, 16, unmarshaler)?;
        Ok(())
    }
}

impl<T: Integer> Item for Hex<T> {}

impl<T> From<T> for Hex<T> {
    fn from(value: T) -> Self {
        Hex(value)
    }
}

/// An integer which is always read in base 8; the octal leader is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Octal<T>(pub T);

impl<T: Integer> Unmarshal for Octal<T> {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        self.0 = fixed_radix(raw, 8, unmarshaler)?;
        Ok(())
    }
}

impl<T: Integer> Item for Octal<T> {}

impl<T> From<T> for Octal<T> {
    fn from(value: T) -> Self {
        Octal(value)
    }
}
