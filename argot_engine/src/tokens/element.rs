use crate::constant::BOUNDARY;
use crate::tokens::{Emitter, LexicalEvent};

/// A classified syntactic unit, assembled from one token's worth of [`LexicalEvent`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Text with no leading dash (or the verbatim text of a degenerate/passthrough token).
    PlainText(String),
    /// `-abc`: a block of short flags.
    ShortBlockSolo(String),
    /// `-abc=value`: a block of short flags with an explicit value.
    ShortBlockPair(String, String),
    /// `--name`
    LongFlagSolo(String),
    /// `--name=value`
    LongFlagPair(String, String),
    /// The literal `--`.
    Boundary,
    /// The tokens are exhausted.
    End,
}

impl Element {
    /// Render the element back into the literal text of its token.
    pub fn literal(&self) -> String {
        match self {
            Element::PlainText(text) => text.clone(),
            Element::ShortBlockSolo(block) => format!("-{block}"),
            Element::ShortBlockPair(block, value) => format!("-{block}={value}"),
            Element::LongFlagSolo(key) => format!("--{key}"),
            Element::LongFlagPair(key, value) => format!("--{key}={value}"),
            Element::Boundary => BOUNDARY.to_string(),
            Element::End => String::default(),
        }
    }
}

// The events of a single token, gathered up to its `Break`.
#[derive(Debug, Default)]
struct Scanned {
    dashes: usize,
    key: String,
    value: Option<String>,
}

impl Scanned {
    fn verbatim(&self) -> String {
        let mut out = "-".repeat(self.dashes);
        out.push_str(&self.key);

        if let Some(value) = &self.value {
            out.push('=');
            out.push_str(value);
        }

        out
    }
}

/// Groups the [`Emitter`]'s events into [`Element`]s.
///
/// Once a [`Element::Boundary`] has been produced, every later token is surfaced verbatim as [`Element::PlainText`].
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Classifier, Element};
///
/// let mut classifier = Classifier::from_tokens(["-ab", "--", "-c"]);
/// assert_eq!(classifier.next_element(), Element::ShortBlockSolo("ab".to_string()));
/// assert_eq!(classifier.next_element(), Element::Boundary);
/// assert_eq!(classifier.next_element(), Element::PlainText("-c".to_string()));
/// assert_eq!(classifier.next_element(), Element::End);
/// ```
#[derive(Debug)]
pub struct Classifier<I> {
    emitter: Emitter<I>,
    passthrough: bool,
}

impl<I, S> Classifier<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// Create a classifier pulling from the emitter.
    pub fn new(emitter: Emitter<I>) -> Self {
        Self {
            emitter,
            passthrough: false,
        }
    }

    /// Create a classifier directly over the raw tokens.
    pub fn from_tokens(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self::new(Emitter::new(tokens))
    }

    /// Whether the boundary marker has been passed.
    pub fn in_passthrough(&self) -> bool {
        self.passthrough
    }

    /// Assemble the next element.
    pub fn next_element(&mut self) -> Element {
        let scanned = match self.scan() {
            Some(scanned) => scanned,
            None => return Element::End,
        };

        if self.passthrough {
            return Element::PlainText(scanned.verbatim());
        }

        match scanned.dashes {
            0 => Element::PlainText(scanned.verbatim()),
            1 => match scanned.value {
                // A lone '-' is conventionally a positional (ex: stdin).
                None if scanned.key.is_empty() => Element::PlainText(scanned.verbatim()),
                None => Element::ShortBlockSolo(scanned.key),
                Some(value) => Element::ShortBlockPair(scanned.key, value),
            },
            2 => match scanned.value {
                None if scanned.key.is_empty() => {
                    self.passthrough = true;
                    Element::Boundary
                }
                None => Element::LongFlagSolo(scanned.key),
                Some(value) => Element::LongFlagPair(scanned.key, value),
            },
            _ => Element::PlainText(scanned.verbatim()),
        }
    }

    fn scan(&mut self) -> Option<Scanned> {
        let mut scanned = Scanned::default();

        loop {
            match self.emitter.next_event() {
                LexicalEvent::Dash => scanned.dashes += 1,
                LexicalEvent::Text(text) => match scanned.value.as_mut() {
                    Some(value) => value.push_str(&text),
                    None => scanned.key.push_str(&text),
                },
                LexicalEvent::Equals => {
                    scanned.value.replace(String::default());
                }
                LexicalEvent::Break => return Some(scanned),
                LexicalEvent::End => {
                    if scanned.dashes == 0 && scanned.key.is_empty() && scanned.value.is_none() {
                        return None;
                    } else {
                        unreachable!("internal error - the emitter must break every token");
                    }
                }
            }
        }
    }
}

impl<I, S> Iterator for Classifier<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_element() {
            Element::End => None,
            element => Some(element),
        }
    }
}
