use std::collections::HashMap;

use crate::api::{Argument, Flag, FlagGroup};
use crate::parser::ConfigError;

/// Handle to a flag within a built command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagId(pub(crate) usize);

/// Handle to a positional argument within a built command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgumentId(pub(crate) usize);

/// Handle to a node of a command tree (a flat command has just the one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug)]
pub(crate) enum Route {
    Branch(Vec<NodeId>),
    Leaf(Vec<ArgumentId>),
}

#[derive(Debug)]
pub(crate) struct NodeDecl {
    pub name: String,
    pub about: Option<String>,
    pub parent: Option<NodeId>,
    pub groups: Vec<(String, Vec<FlagId>)>,
    pub route: Route,
    shorts: HashMap<char, FlagId>,
    longs: HashMap<String, FlagId>,
}

/// The arena of declarations; the parse refers into it by handle and never mutates it.
#[derive(Debug, Default)]
pub(crate) struct Grammar<'a> {
    flags: Vec<Flag<'a>>,
    arguments: Vec<Argument<'a>>,
    nodes: Vec<NodeDecl>,
}

impl<'a> Grammar<'a> {
    pub(crate) fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeDecl {
        &self.nodes[id.0]
    }

    pub(crate) fn flag(&self, id: FlagId) -> &Flag<'a> {
        &self.flags[id.0]
    }

    pub(crate) fn argument(&self, id: ArgumentId) -> &Argument<'a> {
        &self.arguments[id.0]
    }

    pub(crate) fn flag_count(&self) -> usize {
        self.flags.len()
    }

    pub(crate) fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Add a node (the first one added is the root), validating its flags against everything reachable from it.
    pub(crate) fn add_node(
        &mut self,
        name: String,
        about: Option<String>,
        parent: Option<NodeId>,
        groups: Vec<FlagGroup<'a>>,
        leaf: bool,
    ) -> Result<NodeId, ConfigError> {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeDecl {
            name,
            about,
            parent,
            groups: Vec::default(),
            route: if leaf {
                Route::Leaf(Vec::default())
            } else {
                Route::Branch(Vec::default())
            },
            shorts: HashMap::default(),
            longs: HashMap::default(),
        });

        for group in groups {
            let (group_name, flags) = group.into_parts();
            let mut flag_ids = Vec::default();

            for flag in flags {
                flag_ids.push(self.add_flag(id, flag)?);
            }

            self.nodes[id.0].groups.push((group_name, flag_ids));
        }

        if let Some(parent) = parent {
            self.attach(parent, id)?;
        }

        Ok(id)
    }

    fn add_flag(&mut self, node: NodeId, flag: Flag<'a>) -> Result<FlagId, ConfigError> {
        validate_identifiers(&flag)?;
        let id = FlagId(self.flags.len());

        if let Some(short) = flag.short_name() {
            if self.find_short(node, short).is_some() {
                return Err(ConfigError::DuplicateShort(short));
            }

            self.nodes[node.0].shorts.insert(short, id);
        }

        if let Some(long) = flag.long_name() {
            if self.find_long(node, long).is_some() {
                return Err(ConfigError::DuplicateLong(long.to_string()));
            }

            self.nodes[node.0].longs.insert(long.to_string(), id);
        }

        self.flags.push(flag);
        Ok(id)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), ConfigError> {
        let name = self.nodes[child.0].name.clone();

        if name.is_empty() || name.starts_with('-') {
            return Err(ConfigError::InvalidSubCommand(name));
        }

        if self.child(parent, &name).is_some() {
            return Err(ConfigError::DuplicateSubCommand(name));
        }

        let parent = &mut self.nodes[parent.0];

        match &mut parent.route {
            Route::Branch(children) => {
                children.push(child);
                Ok(())
            }
            Route::Leaf(_) => Err(ConfigError::Misplaced(format!(
                "cannot add the sub-command '{name}' to the leaf '{leaf}'.",
                leaf = parent.name
            ))),
        }
    }

    pub(crate) fn add_argument(
        &mut self,
        node: NodeId,
        argument: Argument<'a>,
    ) -> Result<ArgumentId, ConfigError> {
        let id = ArgumentId(self.arguments.len());
        let node = &mut self.nodes[node.0];

        match &mut node.route {
            Route::Leaf(arguments) => arguments.push(id),
            Route::Branch(_) => {
                return Err(ConfigError::Misplaced(format!(
                    "cannot add the argument '{hint}' to the branch '{branch}'.",
                    hint = argument.hint(),
                    branch = node.name
                )));
            }
        }

        self.arguments.push(argument);
        Ok(id)
    }

    /// The node itself, then each ancestor up to the root.
    pub(crate) fn ancestry(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |current| self.node(*current).parent)
    }

    /// Every flag reachable from the node.
    pub(crate) fn scope(&self, id: NodeId) -> Vec<FlagId> {
        self.ancestry(id)
            .flat_map(|node| {
                self.node(node)
                    .groups
                    .iter()
                    .flat_map(|(_, flags)| flags.iter().copied())
            })
            .collect()
    }

    pub(crate) fn find_short(&self, from: NodeId, short: char) -> Option<FlagId> {
        self.ancestry(from)
            .find_map(|node| self.node(node).shorts.get(&short).copied())
    }

    pub(crate) fn find_long(&self, from: NodeId, long: &str) -> Option<FlagId> {
        self.ancestry(from)
            .find_map(|node| self.node(node).longs.get(long).copied())
    }

    pub(crate) fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(id).route {
            Route::Branch(children) => children
                .iter()
                .copied()
                .find(|child| self.node(*child).name == name),
            Route::Leaf(_) => None,
        }
    }

    pub(crate) fn positionals(&self, id: NodeId) -> &[ArgumentId] {
        match &self.node(id).route {
            Route::Leaf(arguments) => arguments,
            Route::Branch(_) => &[],
        }
    }

    pub(crate) fn path(&self, names: &[&str]) -> Option<NodeId> {
        names
            .iter()
            .try_fold(self.root(), |node, name| self.child(node, name))
    }
}

fn validate_identifiers(flag: &Flag) -> Result<(), ConfigError> {
    if flag.short_name().is_none() && flag.long_name().is_none() {
        return Err(ConfigError::MissingIdentifier);
    }

    if let Some(short) = flag.short_name() {
        if !short.is_alphanumeric() {
            return Err(ConfigError::InvalidShort(short));
        }
    }

    if let Some(long) = flag.long_name() {
        let mut characters = long.chars();
        let valid = characters.next().map_or(false, char::is_alphanumeric)
            && characters.all(|c| c.is_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(ConfigError::InvalidLong(long.to_string()));
        }
    }

    Ok(())
}

/// The outcome of matching for a single argument slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentState {
    values: Vec<String>,
}

impl ArgumentState {
    /// Whether the argument was filled from the input.
    pub fn was_hit(&self) -> bool {
        !self.values.is_empty()
    }

    /// The most recent raw value.
    pub fn raw_value(&self) -> Option<&str> {
        self.values.last().map(String::as_str)
    }

    /// Every raw value, in input order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn record(&mut self, raw: impl Into<String>) {
        self.values.push(raw.into());
    }
}

/// The outcome of matching for a single flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagState {
    hits: usize,
    argument: ArgumentState,
}

impl FlagState {
    /// How many times the flag was hit.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Whether the flag was hit at all.
    pub fn was_hit(&self) -> bool {
        self.hits > 0
    }

    /// The state of the flag's argument.
    pub fn argument(&self) -> &ArgumentState {
        &self.argument
    }

    pub(crate) fn hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn argument_mut(&mut self) -> &mut ArgumentState {
        &mut self.argument
    }
}

/// The result of a successful parse.
///
/// Bound destinations have already been written; this carries everything else keyed by handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub(crate) flags: Vec<FlagState>,
    pub(crate) arguments: Vec<ArgumentState>,
    pub(crate) unmapped: Vec<String>,
    pub(crate) passthrough: Vec<String>,
    pub(crate) path: Vec<String>,
    pub(crate) node: NodeId,
}

impl Parsed {
    pub(crate) fn new(flags: usize, arguments: usize, node: NodeId) -> Self {
        Self {
            flags: vec![FlagState::default(); flags],
            arguments: vec![ArgumentState::default(); arguments],
            unmapped: Vec::default(),
            passthrough: Vec::default(),
            path: Vec::default(),
            node,
        }
    }

    /// The state of a flag.
    pub fn flag(&self, id: FlagId) -> &FlagState {
        &self.flags[id.0]
    }

    /// How many times the flag was hit.
    pub fn hits(&self, id: FlagId) -> usize {
        self.flag(id).hits()
    }

    /// The state of a positional argument.
    pub fn argument(&self, id: ArgumentId) -> &ArgumentState {
        &self.arguments[id.0]
    }

    /// Flag-shaped tokens that matched no flag (re-prefixed with their dashes), and surplus positional text.
    pub fn unmapped(&self) -> &[String] {
        &self.unmapped
    }

    /// Every token after the `--` boundary, verbatim.
    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    /// The sub-command names descended through (empty for a flat command).
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The node the parse finished at.
    pub fn node(&self) -> NodeId {
        self.node
    }
}
