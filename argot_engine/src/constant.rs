// Integer leaders recognized after the (optional) sign.
pub(crate) const HEX_LEADERS: [&str; 4] = ["0x", "0X", "x", "X"];
pub(crate) const OCTAL_LEADERS: [&str; 4] = ["0o", "0O", "o", "O"];

// Map entries split on the first occurrence of any of these.
pub(crate) const KEY_VALUE_SEPARATORS: [char; 2] = ['=', ':'];

// Compared case-insensitively.
pub(crate) const TRUE_WORDS: [&str; 6] = ["true", "t", "yes", "y", "on", "1"];
pub(crate) const FALSE_WORDS: [&str; 6] = ["false", "f", "no", "n", "off", "0"];

pub(crate) const PRESENCE_VALUE: &str = "true";
pub(crate) const BOUNDARY: &str = "--";
pub(crate) const DEFAULT_GROUP: &str = "options";

// Printer layout.
pub(crate) const FALLBACK_WIDTH: usize = 80;
pub(crate) const PADDING_WIDTH: usize = 2;
pub(crate) const MAIN_INDENT: usize = 1;
// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_DESCRIPTION_WIDTH: usize = 17;
