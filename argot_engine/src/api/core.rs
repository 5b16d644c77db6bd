use crate::api::{Argument, Flag, FlagGroup};
use crate::constant::DEFAULT_GROUP;
use crate::matcher::{ArgumentId, FlagId, Grammar, Interpreter, NodeId, Parsed};
use crate::parser::{ConfigError, ParseError, Printer};
use crate::unmarshal::Unmarshaler;

// Flags declared directly on a builder land in the implicit group, which always renders first.
struct Groups<'a> {
    implicit: FlagGroup<'a>,
    named: Vec<FlagGroup<'a>>,
}

impl<'a> Default for Groups<'a> {
    fn default() -> Self {
        Self {
            implicit: FlagGroup::new(DEFAULT_GROUP),
            named: Vec::default(),
        }
    }
}

impl<'a> Groups<'a> {
    fn flag(&mut self, flag: Flag<'a>) {
        self.implicit.push(flag);
    }

    fn group(&mut self, group: FlagGroup<'a>) {
        self.named.push(group);
    }

    fn into_vec(self) -> Vec<FlagGroup<'a>> {
        std::iter::once(self.implicit)
            .chain(self.named)
            .collect()
    }
}

/// A flat command: one set of flags and positional arguments.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Argument, Binding, Command, Flag};
///
/// let mut verbose = false;
/// let mut path = String::default();
/// let command = Command::build("program")
///     .about("Does a thing to a path.")
///     .flag(Flag::new().short('v').long("verbose").argument(Argument::new().bind(Binding::new(&mut verbose))))
///     .argument(Argument::named("PATH").required().bind(Binding::new(&mut path)))
///     .finish()
///     .unwrap();
///
/// let parsed = command.parse(&["program", "/tmp", "-v"]).unwrap();
/// assert!(parsed.unmapped().is_empty());
/// drop(command);
///
/// assert!(verbose);
/// assert_eq!(path, "/tmp");
/// ```
#[derive(Debug)]
pub struct Command<'a> {
    program: String,
    about: Option<String>,
    grammar: Grammar<'a>,
    unmarshaler: Unmarshaler,
}

impl<'a> Command<'a> {
    /// Start declaring a command.
    pub fn build(program: impl Into<String>) -> CommandBuilder<'a> {
        CommandBuilder {
            program: program.into(),
            about: None,
            groups: Groups::default(),
            arguments: Vec::default(),
            unmarshaler: Unmarshaler::default(),
        }
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The about message, if any.
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Parse the command line arguments, skipping the first (program name) token.
    ///
    /// Matched values are written into their bindings immediately.
    /// The parse stops at the first conversion error, while every missing requirement is reported together at the end.
    pub fn parse<S: AsRef<str>>(&self, argv: &[S]) -> Result<Parsed, ParseError> {
        self.parse_tokens(argv.get(1..).unwrap_or_default())
    }

    /// Parse the tokens as they are (there is no program name to skip).
    pub fn parse_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Parsed, ParseError> {
        Interpreter::new(&self.grammar, &self.unmarshaler, tokens.iter()).run()
    }

    /// Find the flag by its short name.
    pub fn find_short(&self, short: char) -> Option<FlagId> {
        self.grammar.find_short(self.grammar.root(), short)
    }

    /// Find the flag by its long name (without the leading dashes).
    pub fn find_long(&self, long: &str) -> Option<FlagId> {
        self.grammar.find_long(self.grammar.root(), long)
    }

    /// Find the positional argument by its name.
    pub fn argument_id(&self, name: &str) -> Option<ArgumentId> {
        find_argument(&self.grammar, self.grammar.root(), name)
    }

    /// Look up the declaration of a flag.
    pub fn flag(&self, id: FlagId) -> &Flag<'a> {
        self.grammar.flag(id)
    }

    /// Render the help message, sized to the terminal.
    pub fn help(&self) -> String {
        self.render(&Printer::terminal())
    }

    /// Render the help message with the printer.
    pub fn render(&self, printer: &Printer) -> String {
        printer.render(&self.program, self.about(), &self.grammar, self.grammar.root())
    }
}

/// Builder for a [`Command`].
pub struct CommandBuilder<'a> {
    program: String,
    about: Option<String>,
    groups: Groups<'a>,
    arguments: Vec<Argument<'a>>,
    unmarshaler: Unmarshaler,
}

impl<'a> CommandBuilder<'a> {
    /// Document the about message for this command.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about.replace(about.into());
        self
    }

    /// Add a flag to the implicit `options` group.
    pub fn flag(mut self, flag: Flag<'a>) -> Self {
        self.groups.flag(flag);
        self
    }

    /// Add a named group of flags.
    pub fn group(mut self, group: FlagGroup<'a>) -> Self {
        self.groups.group(group);
        self
    }

    /// Add a positional argument.
    /// Positional arguments are filled in the order they are added.
    pub fn argument(mut self, argument: Argument<'a>) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Replace the default [`Unmarshaler`].
    pub fn unmarshaler(mut self, unmarshaler: Unmarshaler) -> Self {
        self.unmarshaler = unmarshaler;
        self
    }

    /// Finalize the declaration, checking for errors (ex: a repeated flag name).
    pub fn finish(self) -> Result<Command<'a>, ConfigError> {
        let mut grammar = Grammar::default();
        let root = grammar.add_node(
            self.program.clone(),
            self.about.clone(),
            None,
            self.groups.into_vec(),
            true,
        )?;

        for argument in self.arguments {
            grammar.add_argument(root, argument)?;
        }

        Ok(Command {
            program: self.program,
            about: self.about,
            grammar,
            unmarshaler: self.unmarshaler,
        })
    }
}

/// A sub-command tree: branches select children by name, leaves take positional arguments.
///
/// Flags declared on a node are reachable from it and from all its descendants.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{Argument, Binding, CommandTree, Flag, Node};
///
/// let mut name = String::default();
/// let tree = CommandTree::build("git")
///     .flag(Flag::new().short('v').long("verbose"))
///     .child(Node::branch("remote").child(
///         Node::leaf("add").argument(Argument::named("NAME").required().bind(Binding::new(&mut name))),
///     ))
///     .finish()
///     .unwrap();
///
/// let parsed = tree.parse(&["remote", "-v", "add", "origin"]).unwrap();
/// assert_eq!(parsed.path(), &["remote", "add"]);
/// assert_eq!(parsed.hits(tree.find_long(tree.root(), "verbose").unwrap()), 1);
/// drop(tree);
///
/// assert_eq!(name, "origin");
/// ```
#[derive(Debug)]
pub struct CommandTree<'a> {
    program: String,
    grammar: Grammar<'a>,
    unmarshaler: Unmarshaler,
}

impl<'a> CommandTree<'a> {
    /// Start declaring a tree; the root is a branch.
    pub fn build(program: impl Into<String>) -> TreeBuilder<'a> {
        TreeBuilder {
            program: program.into(),
            about: None,
            groups: Groups::default(),
            children: Vec::default(),
            unmarshaler: Unmarshaler::default(),
        }
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Parse the full list of tokens, descending from the root.
    ///
    /// Stopping at a branch is not an error: check [`Parsed::path`] to see where the parse ended.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Parsed, ParseError> {
        Interpreter::new(&self.grammar, &self.unmarshaler, tokens.iter()).run()
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.grammar.root()
    }

    /// Find a node by the names along its path from the root (the empty path is the root).
    pub fn node_id(&self, path: &[&str]) -> Option<NodeId> {
        self.grammar.path(path)
    }

    /// Find a flag reachable from the node by its short name.
    pub fn find_short(&self, node: NodeId, short: char) -> Option<FlagId> {
        self.grammar.find_short(node, short)
    }

    /// Find a flag reachable from the node by its long name.
    pub fn find_long(&self, node: NodeId, long: &str) -> Option<FlagId> {
        self.grammar.find_long(node, long)
    }

    /// Find a positional argument of the (leaf) node by its name.
    pub fn argument_id(&self, node: NodeId, name: &str) -> Option<ArgumentId> {
        find_argument(&self.grammar, node, name)
    }

    /// Look up the declaration of a flag.
    pub fn flag(&self, id: FlagId) -> &Flag<'a> {
        self.grammar.flag(id)
    }

    /// Render the help message of the node, sized to the terminal.
    pub fn help(&self, node: NodeId) -> String {
        self.render(&Printer::terminal(), node)
    }

    /// Render the help message of the node with the printer.
    pub fn render(&self, printer: &Printer, node: NodeId) -> String {
        let mut names: Vec<&str> = self
            .grammar
            .ancestry(node)
            .map(|id| self.grammar.node(id).name.as_str())
            .collect();
        names.reverse();
        let about = self.grammar.node(node).about.as_deref();
        printer.render(&names.join(" "), about, &self.grammar, node)
    }
}

/// Builder for a [`CommandTree`].
pub struct TreeBuilder<'a> {
    program: String,
    about: Option<String>,
    groups: Groups<'a>,
    children: Vec<Node<'a>>,
    unmarshaler: Unmarshaler,
}

impl<'a> TreeBuilder<'a> {
    /// Document the about message for the program.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about.replace(about.into());
        self
    }

    /// Add a root flag (reachable everywhere) to the implicit `options` group.
    pub fn flag(mut self, flag: Flag<'a>) -> Self {
        self.groups.flag(flag);
        self
    }

    /// Add a named group of root flags.
    pub fn group(mut self, group: FlagGroup<'a>) -> Self {
        self.groups.group(group);
        self
    }

    /// Add a sub-command.
    pub fn child(mut self, node: Node<'a>) -> Self {
        self.children.push(node);
        self
    }

    /// Replace the default [`Unmarshaler`].
    pub fn unmarshaler(mut self, unmarshaler: Unmarshaler) -> Self {
        self.unmarshaler = unmarshaler;
        self
    }

    /// Finalize the tree, checking every node (ex: duplicate flags along a path, or duplicate sub-command names).
    pub fn finish(self) -> Result<CommandTree<'a>, ConfigError> {
        let mut grammar = Grammar::default();
        let root = grammar.add_node(
            self.program.clone(),
            self.about,
            None,
            self.groups.into_vec(),
            false,
        )?;

        for child in self.children {
            child.attach(&mut grammar, root)?;
        }

        Ok(CommandTree {
            program: self.program,
            grammar,
            unmarshaler: self.unmarshaler,
        })
    }
}

/// A node of a [`CommandTree`].
///
/// A branch holds sub-commands, while a leaf holds positional arguments.
/// Mixing these up is reported when the tree is finished.
pub struct Node<'a> {
    name: String,
    about: Option<String>,
    leaf: bool,
    groups: Groups<'a>,
    arguments: Vec<Argument<'a>>,
    children: Vec<Node<'a>>,
}

impl<'a> Node<'a> {
    fn new(name: impl Into<String>, leaf: bool) -> Self {
        Self {
            name: name.into(),
            about: None,
            leaf,
            groups: Groups::default(),
            arguments: Vec::default(),
            children: Vec::default(),
        }
    }

    /// Create a branch, selecting among its children.
    pub fn branch(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Create a leaf, taking positional arguments.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Document the about message for this sub-command.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about.replace(about.into());
        self
    }

    /// Add a flag (reachable from this node and its descendants) to the implicit `options` group.
    pub fn flag(mut self, flag: Flag<'a>) -> Self {
        self.groups.flag(flag);
        self
    }

    /// Add a named group of flags.
    pub fn group(mut self, group: FlagGroup<'a>) -> Self {
        self.groups.group(group);
        self
    }

    /// Add a sub-command (branches only).
    pub fn child(mut self, node: Node<'a>) -> Self {
        self.children.push(node);
        self
    }

    /// Add a positional argument (leaves only).
    pub fn argument(mut self, argument: Argument<'a>) -> Self {
        self.arguments.push(argument);
        self
    }

    fn attach(self, grammar: &mut Grammar<'a>, parent: NodeId) -> Result<NodeId, ConfigError> {
        let id = grammar.add_node(
            self.name,
            self.about,
            Some(parent),
            self.groups.into_vec(),
            self.leaf,
        )?;

        for argument in self.arguments {
            grammar.add_argument(id, argument)?;
        }

        for child in self.children {
            child.attach(grammar, id)?;
        }

        Ok(id)
    }
}

fn find_argument(grammar: &Grammar, node: NodeId, name: &str) -> Option<ArgumentId> {
    grammar
        .positionals(node)
        .iter()
        .copied()
        .find(|id| grammar.argument(*id).name() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Binding;
    use crate::parser::Missing;
    use rstest::rstest;

    #[test]
    fn command_empty() {
        let command = Command::build("program").finish().unwrap();
        let tokens: &[&str] = &[];

        let parsed = command.parse(tokens).unwrap();
        assert!(parsed.unmapped().is_empty());
        assert!(parsed.passthrough().is_empty());
        assert!(parsed.path().is_empty());
    }

    #[test]
    fn command_skips_program() {
        let mut value = String::default();
        let command = Command::build("program")
            .argument(Argument::named("VALUE").bind(Binding::new(&mut value)))
            .finish()
            .unwrap();

        let parsed = command.parse(&["program", "one", "two"]).unwrap();
        assert_eq!(parsed.unmapped(), &["two"]);
        let id = command.argument_id("VALUE").unwrap();
        assert_eq!(parsed.argument(id).raw_value(), Some("one"));
        assert_eq!(command.argument_id("OTHER"), None);
        drop(command);
        assert_eq!(value, "one");
    }

    #[test]
    fn command_reusable() {
        let command = Command::build("program")
            .flag(Flag::new().short('a').long("all"))
            .finish()
            .unwrap();
        let id = command.find_short('a').unwrap();
        assert_eq!(command.find_long("all"), Some(id));
        assert_eq!(command.flag(id).display_name(), "--all");

        assert_eq!(command.parse(&["program", "-a"]).unwrap().hits(id), 1);
        assert_eq!(command.parse(&["program"]).unwrap().hits(id), 0);
        assert_eq!(command.parse_tokens(&["-aa"]).unwrap().hits(id), 2);
    }

    #[test]
    fn command_groups() {
        let command = Command::build("program")
            .flag(Flag::new().short('a'))
            .group(FlagGroup::new("output").flag(Flag::new().short('o')))
            .finish()
            .unwrap();

        assert!(command.find_short('a').is_some());
        assert!(command.find_short('o').is_some());
    }

    #[rstest]
    #[case(Flag::new().short('a'), Flag::new().short('a'), ConfigError::DuplicateShort('a'))]
    #[case(Flag::new().long("all"), Flag::new().long("all"), ConfigError::DuplicateLong("all".to_string()))]
    #[case(Flag::new().short('a'), Flag::new(), ConfigError::MissingIdentifier)]
    fn command_config_error(
        #[case] first: Flag,
        #[case] second: Flag,
        #[case] expected: ConfigError,
    ) {
        let error = Command::build("program")
            .flag(first)
            .group(FlagGroup::new("other").flag(second))
            .finish()
            .unwrap_err();
        assert_eq!(error, expected);
    }

    #[test]
    fn command_missing() {
        let mut value: u8 = 0;
        let command = Command::build("program")
            .flag(Flag::new().short('a').required())
            .flag(Flag::new().short('b').required())
            .argument(Argument::named("VALUE").required().bind(Binding::new(&mut value)))
            .finish()
            .unwrap();

        assert_matches!(command.parse(&["program"]), Err(ParseError::Missing(missing)) => {
            assert_eq!(missing.len(), 3);
            assert_eq!(missing.0[2], Missing::Argument { name: Some("VALUE".to_string()), position: 1 });
        });
    }

    #[test]
    fn command_unmarshaler() {
        let mut value: i32 = 0;
        let command = Command::build("program")
            .argument(Argument::new().bind(Binding::new(&mut value)))
            .unmarshaler(Unmarshaler::default().with_hex_leaders(["#"]))
            .finish()
            .unwrap();

        command.parse(&["program", "#ff"]).unwrap();
        drop(command);
        assert_eq!(value, 255);
    }

    fn sample<'a>() -> TreeBuilder<'a> {
        CommandTree::build("git")
            .about("A content tracker.")
            .flag(Flag::new().short('v').long("verbose"))
            .child(
                Node::leaf("commit")
                    .flag(Flag::new().short('m').long("message").argument(Argument::named("MSG").required()))
                    .argument(Argument::named("PATH")),
            )
            .child(
                Node::branch("remote")
                    .about("Manage remotes.")
                    .child(Node::leaf("add").argument(Argument::named("NAME").required()))
                    .child(Node::leaf("remove")),
            )
    }

    #[test]
    fn tree_lookups() {
        let tree = sample().finish().unwrap();
        let root = tree.root();
        let commit = tree.node_id(&["commit"]).unwrap();
        let add = tree.node_id(&["remote", "add"]).unwrap();

        assert_eq!(tree.node_id(&[]), Some(root));
        assert_eq!(tree.node_id(&["remote", "commit"]), None);
        assert_eq!(tree.find_long(add, "verbose"), tree.find_short(root, 'v'));
        assert!(tree.find_short(commit, 'm').is_some());
        assert!(tree.find_short(root, 'm').is_none());
        assert!(tree.find_short(add, 'm').is_none());
        assert!(tree.argument_id(add, "NAME").is_some());
        assert!(tree.argument_id(commit, "NAME").is_none());
        assert_eq!(tree.program(), "git");
    }

    #[rstest]
    #[case(&["commit", "-m", "hello", "src"], &["commit"])]
    #[case(&["-v", "remote"], &["remote"])]
    #[case(&["remote", "remove", "-v"], &["remote", "remove"])]
    fn tree_parse(#[case] tokens: &[&str], #[case] expected: &[&str]) {
        let tree = sample().finish().unwrap();

        let parsed = tree.parse(tokens).unwrap();
        assert_eq!(parsed.path(), expected);
        assert_eq!(Some(parsed.node()), tree.node_id(expected));
    }

    #[test]
    fn tree_missing_in_leaf() {
        let tree = sample().finish().unwrap();

        assert_matches!(tree.parse(&["remote", "add"]), Err(ParseError::Missing(missing)) => {
            assert_eq!(missing.0, vec![Missing::Argument { name: Some("NAME".to_string()), position: 1 }]);
        });
    }

    #[test]
    fn tree_duplicate_along_path() {
        let error = sample()
            .child(Node::leaf("status").flag(Flag::new().long("verbose")))
            .finish()
            .unwrap_err();
        assert_eq!(error, ConfigError::DuplicateLong("verbose".to_string()));
    }

    #[test]
    fn tree_duplicate_child() {
        let error = sample().child(Node::leaf("commit")).finish().unwrap_err();
        assert_eq!(error, ConfigError::DuplicateSubCommand("commit".to_string()));
    }

    #[test]
    fn tree_misplaced() {
        assert_matches!(
            CommandTree::build("git")
                .child(Node::branch("remote").argument(Argument::named("NAME")))
                .finish(),
            Err(ConfigError::Misplaced(_))
        );
        assert_matches!(
            CommandTree::build("git")
                .child(Node::leaf("remote").child(Node::leaf("add")))
                .finish(),
            Err(ConfigError::Misplaced(_))
        );
    }
}
