use crate::api::{Arity, Argument};
use crate::constant::PRESENCE_VALUE;
use crate::matcher::model::*;
use crate::parser::{Missing, MissingRequirements, ParseError};
use crate::tokens::{Classifier, Element};
use crate::unmarshal::{is_boolean_word, Unmarshaler};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// Where a matched value lands.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Flag(FlagId),
    Positional(ArgumentId),
}

/// Walks classified elements against the grammar, from the root (or a flat command's only node) downward.
///
/// Values are written into their bindings as soon as they are matched; everything else is recorded in the [`Parsed`] outcome.
pub(crate) struct Interpreter<'g, 'a, I> {
    grammar: &'g Grammar<'a>,
    unmarshaler: &'g Unmarshaler,
    classifier: Classifier<I>,
    current: NodeId,
    next_positional: usize,
    // An element pulled as a lookahead which must be dispatched on its own.
    pending: Option<Element>,
    parsed: Parsed,
}

impl<'g, 'a, I, S> Interpreter<'g, 'a, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub(crate) fn new(
        grammar: &'g Grammar<'a>,
        unmarshaler: &'g Unmarshaler,
        tokens: impl IntoIterator<IntoIter = I>,
    ) -> Self {
        let root = grammar.root();
        Self {
            grammar,
            unmarshaler,
            classifier: Classifier::from_tokens(tokens),
            current: root,
            next_positional: 0,
            pending: None,
            parsed: Parsed::new(grammar.flag_count(), grammar.argument_count(), root),
        }
    }

    pub(crate) fn run(mut self) -> Result<Parsed, ParseError> {
        loop {
            let element = self.next_element();

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Dispatching {element:?} at '{}'.", self.grammar.node(self.current).name);
            }

            match element {
                Element::End => break,
                // The classifier surfaces everything after this as plain text.
                Element::Boundary => {}
                Element::PlainText(text) if self.classifier.in_passthrough() => {
                    self.parsed.passthrough.push(text)
                }
                Element::PlainText(text) => self.plain(text)?,
                Element::LongFlagSolo(key) => self.long(key, None)?,
                Element::LongFlagPair(key, value) => self.long(key, Some(value))?,
                Element::ShortBlockSolo(block) => self.short_block(block, None)?,
                Element::ShortBlockPair(block, value) => self.short_block(block, Some(value))?,
            }
        }

        self.complete()
    }

    fn next_element(&mut self) -> Element {
        match self.pending.take() {
            Some(element) => element,
            None => self.classifier.next_element(),
        }
    }

    fn plain(&mut self, text: String) -> Result<(), ParseError> {
        let grammar = self.grammar;

        if self.is_leaf() {
            match grammar.positionals(self.current).get(self.next_positional) {
                Some(&id) => {
                    self.next_positional += 1;
                    self.fill(Slot::Positional(id), text)?;
                }
                None => self.parsed.unmapped.push(text),
            }

            return Ok(());
        }

        match grammar.child(self.current, &text) {
            Some(child) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Descending into sub-command '{text}'.");
                }

                self.current = child;
                self.next_positional = 0;
                self.parsed.node = child;
                self.parsed.path.push(text);
                Ok(())
            }
            None => Err(ParseError::UnrecognizedSubCommand(text)),
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(self.grammar.node(self.current).route, Route::Leaf(_))
    }

    fn long(&mut self, key: String, value: Option<String>) -> Result<(), ParseError> {
        match self.grammar.find_long(self.current, &key) {
            Some(id) => match value {
                Some(value) => self.resolve(id, Some(value)),
                None => self.resolve_from_next(id),
            },
            None => {
                let literal = match value {
                    Some(value) => Element::LongFlagPair(key, value),
                    None => Element::LongFlagSolo(key),
                };
                self.parsed.unmapped.push(literal.literal());
                Ok(())
            }
        }
    }

    fn short_block(&mut self, block: String, value: Option<String>) -> Result<(), ParseError> {
        let characters: Vec<char> = block.chars().collect();

        if characters.is_empty() {
            let literal = match value {
                Some(value) => Element::ShortBlockPair(block, value),
                None => Element::ShortBlockSolo(block),
            };
            self.parsed.unmapped.push(literal.literal());
            return Ok(());
        }

        for (index, short) in characters.iter().copied().enumerate() {
            let last = index + 1 == characters.len();
            let id = match self.grammar.find_short(self.current, short) {
                Some(id) => id,
                None => {
                    self.parsed.unmapped.push(match (&value, last) {
                        (Some(value), true) => format!("-{short}={value}"),
                        _ => format!("-{short}"),
                    });
                    continue;
                }
            };

            // Everything after this character, verbatim (including any '=value').
            let remainder = if last {
                value.clone()
            } else {
                let rest: String = characters[index + 1..].iter().collect();
                Some(match &value {
                    Some(value) => format!("{rest}={value}"),
                    None => rest,
                })
            };

            match self.grammar.flag(id).arity() {
                Arity::Nothing => {
                    self.resolve(id, if last { value.clone() } else { None })?;
                }
                Arity::Required => {
                    return match remainder {
                        Some(remainder) => self.resolve(id, Some(remainder)),
                        None => self.resolve_from_next(id),
                    };
                }
                Arity::Optional if last => {
                    return match remainder {
                        Some(remainder) => self.resolve(id, Some(remainder)),
                        None => self.resolve_from_next(id),
                    };
                }
                Arity::Optional => {
                    // An adjacent known flag always wins over the optional argument.
                    let adjacent = characters[index + 1];

                    if self.grammar.find_short(self.current, adjacent).is_some() {
                        #[cfg(feature = "tracing_debug")]
                        {
                            debug!("Short flag '{short}' yields to adjacent flag '{adjacent}'.");
                        }

                        self.resolve(id, None)?;
                    } else {
                        return self.resolve(id, remainder);
                    }
                }
            }
        }

        Ok(())
    }

    // Resolve a flag whose value (if any) must come from the next element.
    fn resolve_from_next(&mut self, id: FlagId) -> Result<(), ParseError> {
        let arity = self.grammar.flag(id).arity();

        if arity == Arity::Nothing {
            return self.resolve(id, None);
        }

        match self.next_element() {
            Element::End | Element::Boundary => self.resolve(id, None),
            // An optional boolean only takes a boolean word; other text is left for positionals and sub-commands.
            Element::PlainText(text)
                if arity == Arity::Optional
                    && self
                        .grammar
                        .flag(id)
                        .get_argument()
                        .map_or(false, |argument| argument.is_boolean())
                    && !is_boolean_word(&text) =>
            {
                self.pending.replace(Element::PlainText(text));
                self.resolve(id, None)
            }
            Element::PlainText(text) => self.resolve(id, Some(text)),
            element if arity == Arity::Optional && self.recognizes(&element) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Flag '{}' yields to the recognized {element:?}.",
                        self.grammar.flag(id).display_name()
                    );
                }

                self.pending.replace(element);
                self.resolve(id, None)
            }
            element => self.resolve(id, Some(element.literal())),
        }
    }

    // Whether the element's leading key is itself a reachable flag.
    fn recognizes(&self, element: &Element) -> bool {
        match element {
            Element::ShortBlockSolo(block) | Element::ShortBlockPair(block, _) => block
                .chars()
                .next()
                .map_or(false, |short| {
                    self.grammar.find_short(self.current, short).is_some()
                }),
            Element::LongFlagSolo(key) | Element::LongFlagPair(key, _) => {
                self.grammar.find_long(self.current, key).is_some()
            }
            _ => false,
        }
    }

    // Hit the flag, then fill its argument.
    fn resolve(&mut self, id: FlagId, value: Option<String>) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let flag = grammar.flag(id);
        self.parsed.flags[id.0].hit();
        flag.notify();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Hit flag '{}' with value {value:?}.", flag.display_name());
        }

        match (flag.get_argument(), value) {
            (None, None) => Ok(()),
            (None, Some(value)) => Err(ParseError::UnexpectedValue {
                flag: flag.display_name(),
                value,
            }),
            (Some(_), Some(value)) => self.fill(Slot::Flag(id), value),
            (Some(argument), None) if argument.is_boolean() => {
                self.fill(Slot::Flag(id), PRESENCE_VALUE.to_string())
            }
            (Some(_), None) => Ok(()),
        }
    }

    fn fill(&mut self, slot: Slot, raw: String) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let argument = match slot {
            Slot::Flag(id) => grammar.flag(id).get_argument().unwrap_or_else(|| {
                unreachable!("internal error - filled a flag which takes no argument")
            }),
            Slot::Positional(id) => grammar.argument(id),
        };

        if let Some(binding) = argument.binding() {
            binding
                .capture(&raw, self.unmarshaler)
                .map_err(|source| ParseError::Format {
                    target: self.target(slot),
                    source,
                })?;
        }

        match slot {
            Slot::Flag(id) => self.parsed.flags[id.0].argument_mut().record(raw),
            Slot::Positional(id) => self.parsed.arguments[id.0].record(raw),
        }

        Ok(())
    }

    fn target(&self, slot: Slot) -> String {
        match slot {
            Slot::Flag(id) => self.grammar.flag(id).display_name(),
            Slot::Positional(id) => self.grammar.argument(id).hint(),
        }
    }

    fn complete(self) -> Result<Parsed, ParseError> {
        let grammar = self.grammar;
        let scope = grammar.scope(self.current);
        let positionals = grammar.positionals(self.current);
        let mut missing = Vec::default();

        for &id in &scope {
            let flag = grammar.flag(id);
            let state = self.parsed.flag(id);

            if flag.is_required() && !state.was_hit() {
                missing.push(Missing::Flag(flag.display_name()));
            }

            if let Some(argument) = flag.get_argument() {
                if state.was_hit() && argument.is_required() && !state.argument().was_hit() {
                    missing.push(Missing::FlagArgument(flag.display_name()));
                }
            }
        }

        for (position, &id) in positionals.iter().enumerate() {
            let argument = grammar.argument(id);

            if argument.is_required() && !self.parsed.argument(id).was_hit() {
                missing.push(Missing::Argument {
                    name: argument.name().map(ToString::to_string),
                    position: position + 1,
                });
            }
        }

        if !missing.is_empty() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Completed with {} unmet requirements.", missing.len());
            }

            return Err(ParseError::from(MissingRequirements(missing)));
        }

        for &id in &scope {
            if let Some(argument) = grammar.flag(id).get_argument() {
                if !self.parsed.flag(id).argument().was_hit() {
                    self.apply_default(argument, Slot::Flag(id))?;
                }
            }
        }

        for &id in positionals {
            if !self.parsed.argument(id).was_hit() {
                self.apply_default(grammar.argument(id), Slot::Positional(id))?;
            }
        }

        Ok(self.parsed)
    }

    fn apply_default(&self, argument: &Argument<'a>, slot: Slot) -> Result<(), ParseError> {
        match argument.binding() {
            Some(binding) => binding
                .apply_default(self.unmarshaler)
                .map_err(|source| ParseError::Default {
                    target: self.target(slot),
                    source,
                }),
            None => Ok(()),
        }
    }
}
