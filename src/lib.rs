//! Declarative command-line parsing with identifier-indexed typed results.
//!
//! A [`Command`] describes flags, subcommands and positional arguments up
//! front; [`Command::parse`] matches an argument vector against that
//! description and yields an [`OptionMap`] from which each value is read
//! back with the type its definition declared.
//!
//! ```
//! use optmap::{Arg, Command, Flag};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
//! enum Opt {
//!     Help,
//!     Optimize,
//!     Inputs,
//! }
//!
//! let cmd = Command::new("compiler")
//!     .flag(Flag::switch(Opt::Help).long("help").help("print this message"))
//!     .flag(
//!         Flag::scalar::<u32>(Opt::Optimize)
//!             .short('O')
//!             .placeholder("LEVEL")
//!             .default_value(0),
//!     )
//!     .argument(Arg::multi::<String>(Opt::Inputs, "FILE"));
//!
//! let opts = cmd.parse(["-O3", "main.c", "util.c"]).unwrap();
//! assert!(!opts.has(Opt::Help));
//! assert_eq!(*opts.get::<u32>(Opt::Optimize), 3);
//! let inputs: Vec<String> = vec!["main.c".into(), "util.c".into()];
//! assert_eq!(opts.get::<Vec<String>>(Opt::Inputs), &inputs);
//! ```
//!
//! Long flags match by unambiguous prefix, short flags bundle (`-abc`), and
//! `--` ends flag recognition. Errors carry ready-to-print messages prefixed
//! with the command header.

mod command;
mod error;
mod map;
mod matcher;
mod usage;
mod value;

pub use command::{Arg, ArgumentDef, Command, Flag, FlagDef, OptionId, SubcommandDef};
pub use error::{Error, Result};
pub use map::OptionMap;
pub use matcher::ArgumentOrder;
pub use usage::usage;
pub use value::{DecodeFn, ValueKind, predicate};
