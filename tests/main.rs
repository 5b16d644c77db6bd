use std::collections::HashMap;

use argot::prelude::*;
use argot::{
    Argument, Binding, Command, CommandTree, DefaultValue, Flag, FlagGroup, Hex, Missing, Node,
    ParseError, Printer, UnmarshalError, Unmarshaler,
};
use assert_matches::assert_matches;
use rstest::rstest;

#[test]
fn builder_compiles() {
    Command::build("organization").finish().unwrap();
    CommandTree::build("organization").finish().unwrap();
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Point(i32, i32);

impl Unmarshal for Point {
    fn unmarshal(&mut self, raw: &str, unmarshaler: &Unmarshaler) -> Result<(), UnmarshalError> {
        let (x, y) = raw
            .split_once(',')
            .ok_or_else(|| UnmarshalError::codec(raw, "expected 'x,y'"))?;
        unmarshaler.unmarshal(x, &mut self.0)?;
        unmarshaler.unmarshal(y, &mut self.1)?;
        Ok(())
    }
}

impl Item for Point {}

#[test]
fn full_command() {
    let mut verbose = false;
    let mut names: Vec<String> = Vec::default();
    let mut env: HashMap<String, String> = HashMap::default();
    let mut mask: Hex<u32> = Hex::default();
    let mut origin = Point::default();
    let mut target: Option<Point> = None;
    let command = Command::build("program")
        .flag(
            Flag::new()
                .short('v')
                .long("verbose")
                .argument(Argument::new().bind(Binding::new(&mut verbose))),
        )
        .flag(
            Flag::new()
                .short('n')
                .long("name")
                .argument(Argument::named("NAME").required().bind(Binding::new(&mut names))),
        )
        .group(
            FlagGroup::new("environment")
                .flag(
                    Flag::new()
                        .short('e')
                        .argument(Argument::new().required().bind(Binding::new(&mut env))),
                )
                .flag(
                    Flag::new()
                        .long("mask")
                        .argument(Argument::new().required().bind(Binding::new(&mut mask))),
                ),
        )
        .argument(Argument::named("ORIGIN").bind(
            Binding::new(&mut origin).default_value(DefaultValue::text("1,1")),
        ))
        .argument(Argument::named("TARGET").bind(Binding::new(&mut target)))
        .finish()
        .unwrap();

    let parsed = command
        .parse(&[
            "program",
            "-vnalice",
            "--name",
            "bob",
            "-e",
            "HOME=/root",
            "-eUSER:root",
            "--mask=ff",
            "0x10,-3",
            "--unknown",
            "--",
            "-v",
        ])
        .unwrap();

    assert_eq!(parsed.unmapped(), &["--unknown"]);
    assert_eq!(parsed.passthrough(), &["-v"]);
    assert_eq!(parsed.hits(command.find_short('n').unwrap()), 2);
    drop(command);

    assert!(verbose);
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(env.get("HOME").map(String::as_str), Some("/root"));
    assert_eq!(env.get("USER").map(String::as_str), Some("root"));
    assert_eq!(mask, Hex(255));
    assert_eq!(origin, Point(16, -3));
    assert_eq!(target, None);
}

#[rstest]
#[case(vec!["program"], Point(1, 1))]
#[case(vec!["program", "2,3"], Point(2, 3))]
fn custom_default(#[case] argv: Vec<&str>, #[case] expected: Point) {
    let mut point = Point::default();
    let command = Command::build("program")
        .argument(Argument::new().bind(
            Binding::new(&mut point).default_value(DefaultValue::provider(|| Point(1, 1))),
        ))
        .finish()
        .unwrap();

    command.parse(&argv).unwrap();
    drop(command);
    assert_eq!(point, expected);
}

#[test]
fn custom_codec_error() {
    let mut point = Point::default();
    let command = Command::build("program")
        .argument(Argument::named("POINT").bind(Binding::new(&mut point)))
        .finish()
        .unwrap();

    assert_matches!(
        command.parse(&["program", "12"]),
        Err(ParseError::Format { target, source: UnmarshalError::Codec { .. } }) if target == "POINT"
    );
}

#[test]
fn missing_report() {
    let mut first: u8 = 0;
    let command = Command::build("program")
        .flag(Flag::new().short('a').long("alpha").required())
        .flag(Flag::new().short('b').required())
        .argument(Argument::new().required().bind(Binding::new(&mut first)))
        .finish()
        .unwrap();

    let error = command.parse(&["program"]).unwrap_err();
    let message = error.to_string();
    assert_matches!(&error, ParseError::Missing(missing) => {
        assert_eq!(
            missing.0,
            vec![
                Missing::Flag("--alpha".to_string()),
                Missing::Flag("-b".to_string()),
                Missing::Argument { name: None, position: 1 },
            ]
        );
    });
    assert!(message.contains("--alpha"), "{message}");
    assert!(message.contains("-b"), "{message}");
    assert!(message.contains("#1"), "{message}");
}

#[test]
fn tree_scoped_flags() {
    let mut global = 0u32;
    let mut local = 0u32;
    let tree = CommandTree::build("tool")
        .flag(
            Flag::new()
                .long("global")
                .argument(Argument::new().required().bind(Binding::new(&mut global))),
        )
        .child(
            Node::leaf("run").flag(
                Flag::new()
                    .long("local")
                    .argument(Argument::new().required().bind(Binding::new(&mut local))),
            ),
        )
        .finish()
        .unwrap();

    let parsed = tree
        .parse(&["--local=1", "--global=2", "run", "--local=3", "--global", "4"])
        .unwrap();
    assert_eq!(parsed.path(), &["run"]);
    assert_eq!(parsed.unmapped(), &["--local=1"]);
    drop(tree);

    assert_eq!(global, 4);
    assert_eq!(local, 3);
}

#[test]
fn help_message() {
    let command = Command::build("program")
        .about("Does the thing.")
        .flag(Flag::new().short('v').long("verbose").description("Talk more."))
        .argument(Argument::named("PATH").required().description("Where to do it."))
        .finish()
        .unwrap();

    let message = command.render(&Printer::with_width(80));
    assert!(message.starts_with("usage: program [-v] PATH\n"), "{message}");
    assert!(message.contains("Does the thing."), "{message}");
    assert!(message.contains(" -v, --verbose  Talk more."), "{message}");
    assert!(message.contains(" PATH           Where to do it."), "{message}");
}

#[test]
fn boolean_flag_before_sub_command() {
    let mut verbose = false;
    let mut name = String::default();
    let tree = CommandTree::build("git")
        .flag(
            Flag::new()
                .short('v')
                .argument(Argument::new().bind(Binding::new(&mut verbose))),
        )
        .child(Node::leaf("status").argument(Argument::named("NAME").bind(Binding::new(&mut name))))
        .finish()
        .unwrap();

    let parsed = tree.parse(&["-v", "status", "-v", "origin"]).unwrap();
    assert_eq!(parsed.path(), &["status"]);
    assert!(parsed.unmapped().is_empty());
    drop(tree);

    assert!(verbose);
    assert_eq!(name, "origin");
}
