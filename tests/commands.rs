use optmap::{Arg, ArgumentOrder, Command, Flag, OptionMap};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum Top {
    Verbose,
    Help,
    Add,
    Remove,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum AddOpt {
    Force,
    Path,
}

fn command() -> Command<Top> {
    let add = Command::new("prog add")
        .flag(Flag::switch(AddOpt::Force).short('f').long("force"))
        .argument(Arg::scalar::<String>(AddOpt::Path, "PATH"));
    let remove = Command::new("prog remove").argument(Arg::scalar::<String>(AddOpt::Path, "PATH"));
    Command::new("prog")
        .flag(Flag::switch(Top::Verbose).short('v').long("verbose"))
        .flag(Flag::switch(Top::Help).long("help").exclusive())
        .subcommand(Top::Add, "add", "track a path", add)
        .subcommand(Top::Remove, "remove", "stop tracking a path", remove)
}

#[test]
fn subcommand_parses_its_own_vector() {
    let opts = command().parse(["-v", "add", "-f", "src/lib.rs"]).unwrap();
    assert!(opts.has(Top::Verbose));
    assert!(opts.has(Top::Add));
    assert!(!opts.has(Top::Remove));

    let add = opts.get::<OptionMap<AddOpt>>(Top::Add);
    assert!(add.has(AddOpt::Force));
    assert_eq!(add.get::<String>(AddOpt::Path), "src/lib.rs");
}

#[test]
fn parent_flags_after_the_name_belong_to_the_subcommand() {
    let err = command().parse(["add", "-v", "p"]).unwrap_err();
    assert_eq!(err.message(), "prog add: unrecognized option: -v");
}

#[test]
fn missing_command_fails() {
    let err = command().parse(["-v"]).unwrap_err();
    assert_eq!(err.message(), "prog: command required");
}

#[test]
fn unknown_command_fails() {
    let err = command().parse(["fetch"]).unwrap_err();
    assert_eq!(err.message(), "prog: unrecognized command: fetch");
}

#[test]
fn command_names_match_exactly_not_by_prefix() {
    let err = command().parse(["ad"]).unwrap_err();
    assert_eq!(err.message(), "prog: unrecognized command: ad");
}

#[test]
fn subcommand_errors_carry_the_nested_header() {
    let err = command().parse(["add"]).unwrap_err();
    assert_eq!(err.message(), "prog add: argument required: PATH");
}

#[test]
fn exclusive_flag_suppresses_command_requirement() {
    let opts = command().parse(["--help"]).unwrap();
    assert!(opts.has(Top::Help));
    assert!(!opts.has(Top::Add));
}

#[test]
fn exclusive_flag_suppresses_positional_checks() {
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Opt {
        Version,
        Input,
    }

    let cmd = Command::new("prog")
        .flag(Flag::switch(Opt::Version).long("version").exclusive())
        .argument(Arg::scalar::<String>(Opt::Input, "INPUT"));
    let opts = cmd.parse(["--version"]).unwrap();
    assert!(opts.has(Opt::Version));
    assert!(!opts.has(Opt::Input));
}

#[test]
fn ordering_policy_propagates_into_subcommands() {
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Sub {
        Flag,
        Rest,
    }

    let nested = Command::new("prog run")
        .flag(Flag::switch(Sub::Flag).short('x'))
        .argument(Arg::multi::<String>(Sub::Rest, "ARG"));
    let cmd = Command::new("prog").subcommand(Top::Add, "run", "", nested);

    let opts = cmd
        .parse_ordered(["run", "a", "-x", "b"], ArgumentOrder::Flexible)
        .unwrap();
    let run = opts.get::<OptionMap<Sub>>(Top::Add);
    assert!(run.has(Sub::Flag));
    let expected: Vec<String> = vec!["a".into(), "b".into()];
    assert_eq!(run.get::<Vec<String>>(Sub::Rest), &expected);
}

#[test]
fn subcommands_take_precedence_over_positionals() {
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Opt {
        Run,
        Extra,
    }
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Sub {
        Value,
    }

    let nested = Command::new("prog run").argument(Arg::scalar::<i32>(Sub::Value, "N"));
    let cmd = Command::new("prog")
        .subcommand(Opt::Run, "run", "", nested)
        .argument(Arg::scalar::<String>(Opt::Extra, "EXTRA"));

    let opts = cmd.parse(["run", "5"]).unwrap();
    assert!(opts.has(Opt::Run));
    assert!(!opts.has(Opt::Extra));
    let run = opts.get::<OptionMap<Sub>>(Opt::Run);
    assert_eq!(*run.get::<i32>(Sub::Value), 5);
}

#[test]
fn nested_subcommands_resolve_recursively() {
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Mid {
        Inner,
    }
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Leaf {
        Value,
    }

    let leaf = Command::new("prog outer inner").argument(Arg::scalar::<i32>(Leaf::Value, "N"));
    let mid = Command::new("prog outer").subcommand(Mid::Inner, "inner", "", leaf);
    let cmd = Command::new("prog").subcommand(Top::Add, "outer", "", mid);

    let opts = cmd.parse(["outer", "inner", "9"]).unwrap();
    let mid = opts.get::<OptionMap<Mid>>(Top::Add);
    let leaf = mid.get::<OptionMap<Leaf>>(Mid::Inner);
    assert_eq!(*leaf.get::<i32>(Leaf::Value), 9);
}
