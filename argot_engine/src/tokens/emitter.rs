use std::collections::VecDeque;

// A single token scans into at most `dashes + 4` events; most tokens fit comfortably.
const LOOKAHEAD: usize = 6;

/// A primitive lexical event, produced one at a time from the raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalEvent {
    /// A single leading `-` of a token.
    Dash,
    /// Text following the leading dashes, split around the first `=`.
    Text(String),
    /// The first `=` of a token (after its leading dashes).
    Equals,
    /// Separates two tokens.
    Break,
    /// The tokens are exhausted; repeats forever once reached.
    End,
}

/// Turns raw tokens into a lazy stream of [`LexicalEvent`]s.
///
/// Each call to [`Emitter::next_event`] pops one buffered event, scanning the next raw token when the buffer runs dry.
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Emitter, LexicalEvent};
///
/// let mut emitter = Emitter::new(["--name=value"]);
/// assert_eq!(emitter.next_event(), LexicalEvent::Dash);
/// assert_eq!(emitter.next_event(), LexicalEvent::Dash);
/// assert_eq!(emitter.next_event(), LexicalEvent::Text("name".to_string()));
/// assert_eq!(emitter.next_event(), LexicalEvent::Equals);
/// assert_eq!(emitter.next_event(), LexicalEvent::Text("value".to_string()));
/// assert_eq!(emitter.next_event(), LexicalEvent::Break);
/// assert_eq!(emitter.next_event(), LexicalEvent::End);
/// ```
#[derive(Debug)]
pub struct Emitter<I> {
    tokens: I,
    queue: VecDeque<LexicalEvent>,
    exhausted: bool,
}

impl<I, S> Emitter<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// Create an emitter over the raw tokens.
    /// The caller is responsible for skipping the program name, if any.
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            queue: VecDeque::with_capacity(LOOKAHEAD),
            exhausted: false,
        }
    }

    /// Pop the next lexical event.
    pub fn next_event(&mut self) -> LexicalEvent {
        if self.queue.is_empty() && !self.exhausted {
            match self.tokens.next() {
                Some(token) => self.scan(token.as_ref()),
                None => self.exhausted = true,
            }
        }

        self.queue.pop_front().unwrap_or(LexicalEvent::End)
    }

    fn scan(&mut self, token: &str) {
        if token.is_empty() {
            self.queue.push_back(LexicalEvent::Text(String::default()));
            self.queue.push_back(LexicalEvent::Break);
            return;
        }

        let remainder = token.trim_start_matches('-');

        for _ in 0..(token.len() - remainder.len()) {
            self.queue.push_back(LexicalEvent::Dash);
        }

        match remainder.split_once('=') {
            Some((key, value)) => {
                self.queue.push_back(LexicalEvent::Text(key.to_string()));
                self.queue.push_back(LexicalEvent::Equals);
                self.queue.push_back(LexicalEvent::Text(value.to_string()));
            }
            None => {
                self.queue
                    .push_back(LexicalEvent::Text(remainder.to_string()));
            }
        }

        self.queue.push_back(LexicalEvent::Break);
    }
}

impl<I, S> Iterator for Emitter<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = LexicalEvent;

    /// Yields events up to (but not including) [`LexicalEvent::End`].
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            LexicalEvent::End => None,
            event => Some(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use LexicalEvent::*;

    fn text(value: &str) -> LexicalEvent {
        Text(value.to_string())
    }

    #[test]
    fn emitter_empty() {
        let tokens: &[&str] = &[];
        let mut emitter = Emitter::new(tokens);
        assert_eq!(emitter.next_event(), End);
        assert_eq!(emitter.next_event(), End);
    }

    #[rstest]
    #[case("", vec![text(""), Break])]
    #[case("abc", vec![text("abc"), Break])]
    #[case("-a", vec![Dash, text("a"), Break])]
    #[case("-ab=c", vec![Dash, text("ab"), Equals, text("c"), Break])]
    #[case("--", vec![Dash, Dash, text(""), Break])]
    #[case("--foo", vec![Dash, Dash, text("foo"), Break])]
    #[case("--foo=", vec![Dash, Dash, text("foo"), Equals, text(""), Break])]
    #[case("--foo=a=b", vec![Dash, Dash, text("foo"), Equals, text("a=b"), Break])]
    #[case("---foo", vec![Dash, Dash, Dash, text("foo"), Break])]
    #[case("a-b", vec![text("a-b"), Break])]
    #[case("=", vec![text(""), Equals, text(""), Break])]
    fn emitter_scan(#[case] token: &str, #[case] expected: Vec<LexicalEvent>) {
        let emitter = Emitter::new([token]);
        assert_eq!(emitter.collect::<Vec<_>>(), expected);
    }

    #[test]
    fn emitter_many_tokens() {
        let mut emitter = Emitter::new(vec!["-a".to_string(), "x".to_string()]);
        let mut events = Vec::default();

        loop {
            match emitter.next_event() {
                End => break,
                event => events.push(event),
            }
        }

        assert_eq!(events, vec![Dash, text("a"), Break, text("x"), Break]);
        assert_eq!(emitter.next_event(), End);
    }

    #[test]
    fn emitter_deep_dashes() {
        // Exceeds the preallocated lookahead.
        let token = format!("{}x", "-".repeat(10));
        let events: Vec<LexicalEvent> = Emitter::new([token.as_str()]).collect();
        assert_eq!(events.len(), 12);
        assert!(events[..10].iter().all(|e| e == &Dash));
        assert_eq!(events[10..], [text("x"), Break]);
    }
}
