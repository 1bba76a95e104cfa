use optmap::{Arg, Command};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum Opt {
    Name,
    Count,
    Rest,
}

#[test]
fn scalars_consume_in_declaration_order() {
    let cmd = Command::new("prog")
        .argument(Arg::scalar::<String>(Opt::Name, "NAME"))
        .argument(Arg::scalar::<i32>(Opt::Count, "A_INT"));
    let opts = cmd.parse(["alice", "7"]).unwrap();
    assert_eq!(opts.get::<String>(Opt::Name), "alice");
    assert_eq!(*opts.get::<i32>(Opt::Count), 7);
}

#[test]
fn missing_scalar_names_its_placeholder() {
    let cmd = Command::new("prog")
        .argument(Arg::scalar::<String>(Opt::Name, "NAME"))
        .argument(Arg::scalar::<i32>(Opt::Count, "A_INT"));
    let err = cmd.parse([] as [&str; 0]).unwrap_err();
    assert_eq!(err.message(), "prog: argument required: NAME");

    let err = cmd.parse(["alice"]).unwrap_err();
    assert_eq!(err.message(), "prog: argument required: A_INT");
}

#[test]
fn undecodable_scalar_names_placeholder_and_token() {
    let cmd = Command::new("prog").argument(Arg::scalar::<i32>(Opt::Count, "A_INT"));
    let err = cmd.parse(["foo"]).unwrap_err();
    assert_eq!(err.message(), "prog: invalid argument: A_INT=foo");
}

#[test]
fn optional_positional_may_be_absent() {
    let cmd = || {
        Command::new("prog")
            .argument(Arg::scalar::<String>(Opt::Name, "NAME"))
            .argument(Arg::optional::<i32>(Opt::Count, "A_INT"))
    };

    let opts = cmd().parse(["alice"]).unwrap();
    assert_eq!(*opts.get::<Option<i32>>(Opt::Count), None);

    let opts = cmd().parse(["alice", "3"]).unwrap();
    assert_eq!(*opts.get::<Option<i32>>(Opt::Count), Some(3));
}

#[test]
fn trailing_multi_is_present_even_when_empty() {
    let cmd = || {
        Command::new("prog")
            .argument(Arg::scalar::<String>(Opt::Name, "NAME"))
            .argument(Arg::multi::<String>(Opt::Rest, "REST"))
    };

    let opts = cmd().parse(["alice"]).unwrap();
    assert!(opts.has(Opt::Rest));
    assert!(opts.get::<Vec<String>>(Opt::Rest).is_empty());

    let opts = cmd().parse(["alice", "x", "y"]).unwrap();
    let expected: Vec<String> = vec!["x".into(), "y".into()];
    assert_eq!(opts.get::<Vec<String>>(Opt::Rest), &expected);
}

#[test]
fn leftover_token_is_rejected() {
    let cmd = Command::new("prog").argument(Arg::scalar::<String>(Opt::Name, "NAME"));
    let err = cmd.parse(["alice", "extra"]).unwrap_err();
    assert_eq!(err.message(), "prog: unrecognized argument: extra");
}

#[test]
fn custom_decoder_applies_to_positionals() {
    let cmd = Command::new("prog").argument(Arg::scalar_with(
        Opt::Count,
        "EVEN",
        optmap::predicate(|n: &i32| n % 2 == 0),
    ));

    let opts = cmd.parse(["4"]).unwrap();
    assert_eq!(*opts.get::<i32>(Opt::Count), 4);

    let err = cmd.parse(["5"]).unwrap_err();
    assert_eq!(err.message(), "prog: invalid argument: EVEN=5");
}
