use terminal_size::{terminal_size, Width};

use crate::api::Flag;
use crate::constant::*;
use crate::matcher::{FlagId, Grammar, NodeId, Route};

/// Renders the help message of a command (or a node of a command tree).
///
/// The printer only reads the declarations; it has no effect on parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printer {
    width: usize,
}

impl Default for Printer {
    fn default() -> Self {
        Self::with_width(FALLBACK_WIDTH)
    }
}

impl Printer {
    /// Size the output to the terminal, falling back to 80 columns when there is no terminal.
    pub fn terminal() -> Self {
        match terminal_size() {
            Some((Width(width), _)) => Self::with_width(width as usize),
            None => Self::default(),
        }
    }

    /// Size the output to a fixed width.
    pub fn with_width(width: usize) -> Self {
        Self { width }
    }

    /// The total width of the output.
    pub fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn render(
        &self,
        program: &str,
        about: Option<&str>,
        grammar: &Grammar,
        node: NodeId,
    ) -> String {
        let groups = reachable_groups(grammar, node);
        let mut summary: Vec<String> = Vec::default();
        let mut sections: Vec<(String, Vec<(String, String)>)> = Vec::default();

        for (_, flags) in &groups {
            for id in flags {
                let flag = grammar.flag(*id);
                let hint = argument_grammar(flag);
                let item = match flag.short_name() {
                    Some(short) => format!("-{short}{hint}"),
                    None => format!("{}{hint}", flag.display_name()),
                };

                if flag.is_required() {
                    summary.push(item);
                } else {
                    summary.push(format!("[{item}]"));
                }
            }
        }

        let positionals = grammar.positionals(node);

        if !positionals.is_empty() {
            let mut rows = Vec::default();

            for id in positionals {
                let argument = grammar.argument(*id);
                let hint = argument.hint();

                if argument.is_required() {
                    summary.push(hint.clone());
                } else {
                    summary.push(format!("[{hint}]"));
                }

                rows.push((hint, argument.get_description().unwrap_or_default().to_string()));
            }

            sections.push(("positional arguments".to_string(), rows));
        }

        if let Route::Branch(children) = &grammar.node(node).route {
            if !children.is_empty() {
                let names: Vec<&str> = children
                    .iter()
                    .map(|id| grammar.node(*id).name.as_str())
                    .collect();
                summary.push(format!("{{{}}}", names.join(",")));
            }
        }

        for (name, flags) in &groups {
            let rows = flags
                .iter()
                .map(|id| {
                    let flag = grammar.flag(*id);
                    let mut description = flag.get_description().unwrap_or_default().to_string();

                    if flag.is_required() {
                        if !description.is_empty() {
                            description.push(' ');
                        }

                        description.push_str("(required)");
                    }

                    (flag_column(flag), description)
                })
                .collect();
            sections.push((name.to_string(), rows));
        }

        if let Route::Branch(children) = &grammar.node(node).route {
            if !children.is_empty() {
                let rows = children
                    .iter()
                    .map(|id| {
                        let child = grammar.node(*id);
                        (
                            child.name.clone(),
                            child.about.clone().unwrap_or_default(),
                        )
                    })
                    .collect();
                sections.push(("sub-commands".to_string(), rows));
            }
        }

        let left_width = sections
            .iter()
            .flat_map(|(_, rows)| rows.iter().map(|(left, _)| left.len()))
            .max()
            .unwrap_or_default();
        let description_width = std::cmp::max(
            self.width
                .saturating_sub(MAIN_INDENT + left_width + PADDING_WIDTH),
            MINIMUM_DESCRIPTION_WIDTH,
        );

        let mut lines = usage(program, &summary, self.width);

        if let Some(about) = about {
            lines.push(String::default());
            lines.extend(wrap(about, self.width));
        }

        for (title, rows) in sections {
            lines.push(String::default());
            lines.push(format!("{title}:"));

            for (left, description) in rows {
                let mut wrapped = wrap(&description, description_width).into_iter();

                match wrapped.next() {
                    Some(first) => lines.push(format!(
                        "{:indent$}{left:<left_width$}{:padding$}{first}",
                        "",
                        "",
                        indent = MAIN_INDENT,
                        padding = PADDING_WIDTH
                    )),
                    None => lines.push(format!("{:indent$}{left}", "", indent = MAIN_INDENT)),
                }

                for rest in wrapped {
                    lines.push(format!(
                        "{:indent$}{rest}",
                        "",
                        indent = MAIN_INDENT + left_width + PADDING_WIDTH
                    ));
                }
            }
        }

        lines.join("\n")
    }
}

// Groups reachable from the node, outermost first; groups sharing a name are merged.
fn reachable_groups<'g>(grammar: &'g Grammar, node: NodeId) -> Vec<(&'g str, Vec<FlagId>)> {
    let mut ancestry: Vec<NodeId> = grammar.ancestry(node).collect();
    ancestry.reverse();
    let mut groups: Vec<(&'g str, Vec<FlagId>)> = Vec::default();

    for id in ancestry {
        for (name, flags) in &grammar.node(id).groups {
            if flags.is_empty() {
                continue;
            }

            match groups.iter_mut().find(|(existing, _)| *existing == name.as_str()) {
                Some((_, existing)) => existing.extend(flags.iter().copied()),
                None => groups.push((name.as_str(), flags.clone())),
            }
        }
    }

    groups
}

fn argument_grammar(flag: &Flag) -> String {
    match flag.get_argument() {
        None => String::default(),
        Some(argument) if argument.is_required() => format!(" {}", argument.hint()),
        Some(argument) => format!(" [{}]", argument.hint()),
    }
}

fn flag_column(flag: &Flag) -> String {
    let names = match (flag.short_name(), flag.long_name()) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("--{long}"),
        (None, None) => unreachable!("internal error - flag declared without an identifier"),
    };

    format!("{names}{}", argument_grammar(flag))
}

// The usage line, continued under the first item when it is too wide.
fn usage(program: &str, items: &[String], width: usize) -> Vec<String> {
    let leader = format!("usage: {program}");
    let indent = leader.len() + 1;
    let mut lines = Vec::default();
    let mut current = leader;

    for item in items {
        if current.len() > indent && current.len() + 1 + item.len() > width {
            lines.push(std::mem::take(&mut current));
            current = " ".repeat(indent - 1);
        }

        current.push(' ');
        current.push_str(item);
    }

    lines.push(current);
    lines
}

// Greedy word wrap; a word longer than the width gets a line of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }

        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Argument, Binding, FlagGroup};
    use crate::test::assert_contains;
    use rstest::rstest;

    #[rstest]
    #[case("", 10, vec![])]
    #[case("one", 10, vec!["one"])]
    #[case("one two three", 9, vec!["one two", "three"])]
    #[case("one two three", 7, vec!["one two", "three"])]
    #[case("one two three", 6, vec!["one", "two", "three"])]
    #[case("  spaced   out  ", 20, vec!["spaced out"])]
    #[case("abcdefghij xy", 4, vec!["abcdefghij", "xy"])]
    fn wrapping(#[case] text: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(wrap(text, width), expected);
    }

    #[test]
    fn usage_wrapping() {
        let items: Vec<String> = ["[-c U32]", "--dry-run", "[-o [FILE]]", "PATH", "[EXTRA]"]
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            usage("program", &items, 30),
            vec![
                "usage: program [-c U32]",
                "               --dry-run",
                "               [-o [FILE]]",
                "               PATH [EXTRA]",
            ]
        );
        assert_eq!(
            usage("program", &items, 80),
            vec!["usage: program [-c U32] --dry-run [-o [FILE]] PATH [EXTRA]"]
        );
        assert_eq!(usage("program", &[], 5), vec!["usage: program"]);
        // An item wider than the line still starts right after the program.
        assert_eq!(
            usage("program", &items[2..3], 5),
            vec!["usage: program [-o [FILE]]"]
        );
    }

    #[test]
    fn terminal_width() {
        // There is no terminal under test, but either way the width is usable.
        assert!(Printer::terminal().width() > 0);
        assert_eq!(Printer::default().width(), FALLBACK_WIDTH);
    }

    fn flat<'a>(count: &'a mut u32) -> Grammar<'a> {
        let mut grammar = Grammar::default();
        let root = grammar
            .add_node(
                "program".to_string(),
                None,
                None,
                vec![
                    FlagGroup::new(DEFAULT_GROUP)
                        .flag(
                            Flag::new()
                                .short('c')
                                .long("count")
                                .description("How many times to do the thing, which is a long explanation.")
                                .argument(Argument::new().required().bind(Binding::new(count))),
                        )
                        .flag(Flag::new().long("dry-run").required()),
                    FlagGroup::new("output").flag(
                        Flag::new()
                            .short('o')
                            .argument(Argument::named("FILE")),
                    ),
                ],
                true,
            )
            .unwrap();
        grammar
            .add_argument(
                root,
                Argument::named("PATH").required().description("The path."),
            )
            .unwrap();
        grammar
            .add_argument(root, Argument::named("EXTRA"))
            .unwrap();
        grammar
    }

    #[test]
    fn render_flat() {
        let mut count: u32 = 0;
        let grammar = flat(&mut count);

        let message = Printer::with_width(60).render(
            "program",
            Some("Does the thing."),
            &grammar,
            grammar.root(),
        );
        let lines: Vec<&str> = message.lines().collect();

        assert_eq!(
            lines[0],
            "usage: program [-c U32] --dry-run [-o [FILE]] PATH [EXTRA]"
        );
        assert_eq!(lines[2], "Does the thing.");
        assert_contains!(message, "positional arguments:\n PATH");
        assert_contains!(message, "\noptions:\n -c, --count U32");
        assert_contains!(message, "\n --dry-run        (required)");
        assert_contains!(message, "\noutput:\n -o [FILE]");
        assert!(!message.contains("sub-commands"));

        for line in lines {
            assert!(line.len() <= 60, "'{line}' is too wide");
        }
    }

    #[test]
    fn render_narrow() {
        let mut count: u32 = 0;
        let grammar = flat(&mut count);

        let message = Printer::with_width(10).render("program", None, &grammar, grammar.root());

        // The description column never shrinks below its minimum.
        assert_contains!(message, " -c, --count U32  How many times to");
        assert_contains!(message, "usage: program [-c U32]\n               --dry-run\n");
    }

    #[test]
    fn render_tree() {
        let mut grammar = Grammar::default();
        let root = grammar
            .add_node(
                "git".to_string(),
                None,
                None,
                vec![FlagGroup::new(DEFAULT_GROUP).flag(Flag::new().short('v'))],
                false,
            )
            .unwrap();
        let remote = grammar
            .add_node(
                "remote".to_string(),
                Some("Manage remotes.".to_string()),
                Some(root),
                vec![FlagGroup::new(DEFAULT_GROUP).flag(Flag::new().long("all"))],
                false,
            )
            .unwrap();
        grammar
            .add_node("add".to_string(), None, Some(remote), Vec::default(), true)
            .unwrap();
        grammar
            .add_node("remove".to_string(), None, Some(remote), Vec::default(), true)
            .unwrap();

        let message = Printer::with_width(80).render("git", None, &grammar, root);
        assert_contains!(message, "usage: git [-v] {remote}");
        assert_contains!(message, "sub-commands:\n remote  Manage remotes.");

        let message = Printer::with_width(80).render("git remote", None, &grammar, remote);
        assert_contains!(message, "usage: git remote [-v] [--all] {add,remove}");
        // Inherited and local flags of the same group are merged.
        assert_contains!(message, "options:\n -v\n --all");
    }
}
