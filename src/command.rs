use std::fmt;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::Result;
use crate::matcher::{self, ArgumentOrder};
use crate::map::OptionMap;
use crate::value::{
    Binding, DecodeFn, MultiBinding, OptionalBinding, ScalarBinding, Slot, SwitchBinding,
    default_decoder,
};

/// Identifier type for the options of one command.
///
/// Any small copyable key works; an enum deriving `Clone, Copy, PartialEq,
/// Eq, PartialOrd, Ord, Hash, Debug` is the usual choice. Subcommands may
/// use a different identifier type than their parent.
pub trait OptionId: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {}

impl<O> OptionId for O where O: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {}

enum FlagValue<T> {
    Switch,
    Scalar {
        decode: DecodeFn<T>,
        default: Option<T>,
    },
    Optional {
        decode: DecodeFn<T>,
        default: Option<Option<T>>,
    },
    Multi {
        decode: DecodeFn<T>,
        default: Option<Vec<T>>,
    },
}

/// Builder for a named option (`-c`, `--name`).
///
/// Construct with one of [`switch`](Flag::switch), [`scalar`](Flag::scalar),
/// [`optional`](Flag::optional) or [`multi`](Flag::multi) (or their `_with`
/// variants taking a custom decoder), then chain names and presentation and
/// hand the result to [`Command::flag`].
pub struct Flag<O, T = ()> {
    id: O,
    shorts: Vec<char>,
    longs: Vec<String>,
    placeholder: String,
    help: String,
    exclusive: bool,
    default_text: Option<String>,
    value: FlagValue<T>,
}

impl<O: OptionId> Flag<O> {
    /// A value-less flag; stores `()` when present.
    pub fn switch(id: O) -> Self {
        Self::with_value(id, FlagValue::Switch)
    }

    /// A flag requiring one value, decoded via [`FromStr`]; stores `T`.
    pub fn scalar<T>(id: O) -> Flag<O, T>
    where
        T: FromStr + Clone + Send + Sync + 'static,
    {
        Flag::with_value(
            id,
            FlagValue::Scalar {
                decode: default_decoder(),
                default: None,
            },
        )
    }

    /// A flag whose value may be left off; stores `Option<T>`.
    pub fn optional<T>(id: O) -> Flag<O, T>
    where
        T: FromStr + Clone + Send + Sync + 'static,
    {
        Flag::with_value(
            id,
            FlagValue::Optional {
                decode: default_decoder(),
                default: None,
            },
        )
    }

    /// A repeatable flag; stores every occurrence in a `Vec<T>`.
    pub fn multi<T>(id: O) -> Flag<O, T>
    where
        T: FromStr + Clone + Send + Sync + 'static,
    {
        Flag::with_value(
            id,
            FlagValue::Multi {
                decode: default_decoder(),
                default: None,
            },
        )
    }

    /// Like [`scalar`](Flag::scalar) with a custom decoder.
    pub fn scalar_with<T, F>(id: O, decode: F) -> Flag<O, T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Flag::with_value(
            id,
            FlagValue::Scalar {
                decode: Arc::new(decode),
                default: None,
            },
        )
    }

    /// Like [`optional`](Flag::optional) with a custom decoder.
    pub fn optional_with<T, F>(id: O, decode: F) -> Flag<O, T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Flag::with_value(
            id,
            FlagValue::Optional {
                decode: Arc::new(decode),
                default: None,
            },
        )
    }

    /// Like [`multi`](Flag::multi) with a custom decoder.
    pub fn multi_with<T, F>(id: O, decode: F) -> Flag<O, T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Flag::with_value(
            id,
            FlagValue::Multi {
                decode: Arc::new(decode),
                default: None,
            },
        )
    }
}

impl<O: OptionId, T> Flag<O, T> {
    fn with_value(id: O, value: FlagValue<T>) -> Self {
        Self {
            id,
            shorts: Vec::new(),
            longs: Vec::new(),
            placeholder: String::new(),
            help: String::new(),
            exclusive: false,
            default_text: None,
            value,
        }
    }

    /// Adds a single-character name, matched as `-c`.
    pub fn short(mut self, name: char) -> Self {
        self.shorts.push(name);
        self
    }

    /// Adds a long name, matched as `--name` (or any unambiguous prefix).
    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.longs.push(name.into());
        self
    }

    /// Value placeholder shown in usage text and error messages.
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Help text for the usage listing; may span multiple lines.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    /// Marks the flag as short-circuiting, like `--help` or `--version`.
    ///
    /// When an exclusive flag appears, matching stops after the token scan:
    /// no subcommand is required and positionals are not checked.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }
}

impl<O: OptionId, T: Clone + Send + Sync + 'static> Flag<O, T> {
    /// Value used when the flag never appears; shown in usage text.
    ///
    /// # Panics
    ///
    /// Panics on a switch or repeatable flag; use
    /// [`default_values`](Flag::default_values) for the latter.
    pub fn default_value(mut self, value: T) -> Self
    where
        T: Display,
    {
        match &mut self.value {
            FlagValue::Scalar { default, .. } => {
                self.default_text = Some(value.to_string());
                *default = Some(value);
            }
            FlagValue::Optional { default, .. } => {
                self.default_text = Some(value.to_string());
                *default = Some(Some(value));
            }
            _ => panic!("default_value applies to scalar and optional flags only"),
        }
        self
    }

    /// Values pre-loaded into a repeatable flag; occurrences append.
    ///
    /// # Panics
    ///
    /// Panics unless the flag was built with [`multi`](Flag::multi) or
    /// [`multi_with`](Flag::multi_with).
    pub fn default_values(mut self, values: impl IntoIterator<Item = T>) -> Self {
        match &mut self.value {
            FlagValue::Multi { default, .. } => {
                *default = Some(values.into_iter().collect());
            }
            _ => panic!("default_values applies to multi flags only"),
        }
        self
    }

    fn into_def(self) -> FlagDef<O> {
        let binding: Arc<dyn Binding> = match self.value {
            FlagValue::Switch => Arc::new(SwitchBinding),
            FlagValue::Scalar { decode, default } => Arc::new(ScalarBinding { decode, default }),
            FlagValue::Optional { decode, default } => {
                Arc::new(OptionalBinding { decode, default })
            }
            FlagValue::Multi { decode, default } => Arc::new(MultiBinding { decode, default }),
        };
        FlagDef {
            id: self.id,
            shorts: self.shorts,
            longs: self.longs,
            placeholder: self.placeholder,
            help: self.help,
            exclusive: self.exclusive,
            default_text: self.default_text,
            binding,
        }
    }
}

/// A flag after type erasure, as stored inside a [`Command`].
#[derive(Clone)]
pub struct FlagDef<O> {
    id: O,
    shorts: Vec<char>,
    longs: Vec<String>,
    placeholder: String,
    help: String,
    exclusive: bool,
    default_text: Option<String>,
    binding: Arc<dyn Binding>,
}

impl<O: OptionId> FlagDef<O> {
    pub fn id(&self) -> O {
        self.id
    }

    pub fn short_names(&self) -> &[char] {
        &self.shorts
    }

    pub fn long_names(&self) -> &[String] {
        &self.longs
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn kind(&self) -> crate::ValueKind {
        self.binding.kind()
    }

    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    pub(crate) fn binding(&self) -> &dyn Binding {
        &*self.binding
    }
}

enum ArgValue<T> {
    Scalar(DecodeFn<T>),
    Optional(DecodeFn<T>),
    Multi(DecodeFn<T>),
}

/// Builder for a positional argument.
///
/// Positionals are consumed in declaration order after flags and the `--`
/// separator are handled: scalars are required, optionals may be absent,
/// and a trailing multi argument soaks up whatever remains.
pub struct Arg<O, T = String> {
    id: O,
    placeholder: String,
    value: ArgValue<T>,
}

impl<O: OptionId> Arg<O> {
    /// A required positional; stores `T`.
    pub fn scalar<T>(id: O, placeholder: impl Into<String>) -> Arg<O, T>
    where
        T: FromStr + Clone + Send + Sync + 'static,
    {
        Arg::with_value(id, placeholder, ArgValue::Scalar(default_decoder()))
    }

    /// A positional that may be absent; stores `Option<T>`.
    pub fn optional<T>(id: O, placeholder: impl Into<String>) -> Arg<O, T>
    where
        T: FromStr + Clone + Send + Sync + 'static,
    {
        Arg::with_value(id, placeholder, ArgValue::Optional(default_decoder()))
    }

    /// A positional taking every remaining token; stores `Vec<T>`.
    pub fn multi<T>(id: O, placeholder: impl Into<String>) -> Arg<O, T>
    where
        T: FromStr + Clone + Send + Sync + 'static,
    {
        Arg::with_value(id, placeholder, ArgValue::Multi(default_decoder()))
    }

    /// Like [`scalar`](Arg::scalar) with a custom decoder.
    pub fn scalar_with<T, F>(id: O, placeholder: impl Into<String>, decode: F) -> Arg<O, T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Arg::with_value(id, placeholder, ArgValue::Scalar(Arc::new(decode)))
    }

    /// Like [`optional`](Arg::optional) with a custom decoder.
    pub fn optional_with<T, F>(id: O, placeholder: impl Into<String>, decode: F) -> Arg<O, T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Arg::with_value(id, placeholder, ArgValue::Optional(Arc::new(decode)))
    }

    /// Like [`multi`](Arg::multi) with a custom decoder.
    pub fn multi_with<T, F>(id: O, placeholder: impl Into<String>, decode: F) -> Arg<O, T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Arg::with_value(id, placeholder, ArgValue::Multi(Arc::new(decode)))
    }
}

impl<O: OptionId, T> Arg<O, T> {
    fn with_value(id: O, placeholder: impl Into<String>, value: ArgValue<T>) -> Self {
        Self {
            id,
            placeholder: placeholder.into(),
            value,
        }
    }
}

impl<O: OptionId, T: Clone + Send + Sync + 'static> Arg<O, T> {
    fn into_def(self) -> ArgumentDef<O> {
        let binding: Arc<dyn Binding> = match self.value {
            ArgValue::Scalar(decode) => Arc::new(ScalarBinding {
                decode,
                default: None,
            }),
            ArgValue::Optional(decode) => Arc::new(OptionalBinding {
                decode,
                default: None,
            }),
            ArgValue::Multi(decode) => Arc::new(MultiBinding {
                decode,
                default: None,
            }),
        };
        ArgumentDef {
            id: self.id,
            placeholder: self.placeholder,
            binding,
        }
    }
}

/// A positional argument after type erasure.
#[derive(Clone)]
pub struct ArgumentDef<O> {
    id: O,
    placeholder: String,
    binding: Arc<dyn Binding>,
}

impl<O: OptionId> ArgumentDef<O> {
    pub fn id(&self) -> O {
        self.id
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn kind(&self) -> crate::ValueKind {
        self.binding.kind()
    }

    pub(crate) fn binding(&self) -> &dyn Binding {
        &*self.binding
    }
}

type SubcommandRun = Arc<dyn Fn(&[String], ArgumentOrder) -> Result<Slot> + Send + Sync>;

/// A nested command reachable by name from its parent.
///
/// The nested result map is type-erased here because the subcommand may use
/// a different identifier type; recover it with
/// `map.get::<OptionMap<Sub>>(id)`.
#[derive(Clone)]
pub struct SubcommandDef<O> {
    id: O,
    name: String,
    help: String,
    run: SubcommandRun,
}

impl<O: OptionId> SubcommandDef<O> {
    pub fn id(&self) -> O {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub(crate) fn run(&self, args: &[String], order: ArgumentOrder) -> Result<Slot> {
        (self.run)(args, order)
    }
}

/// A complete command-line interface description.
///
/// Built once, then matched against any number of argument vectors; the
/// definition is immutable after construction and shares freely across
/// threads.
///
/// ```
/// use optmap::{Command, Flag, Arg};
///
/// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
/// enum Opt {
///     Verbose,
///     Output,
///     Inputs,
/// }
///
/// let cmd = Command::new("pack")
///     .flag(Flag::switch(Opt::Verbose).short('v').long("verbose"))
///     .flag(
///         Flag::scalar::<String>(Opt::Output)
///             .short('o')
///             .long("output")
///             .placeholder("FILE"),
///     )
///     .argument(Arg::multi::<String>(Opt::Inputs, "INPUT"));
///
/// let opts = cmd.parse(["-v", "-o", "out.bin", "a.txt", "b.txt"]).unwrap();
/// assert!(opts.has(Opt::Verbose));
/// assert_eq!(opts.get::<String>(Opt::Output), "out.bin");
/// assert_eq!(opts.get::<Vec<String>>(Opt::Inputs).len(), 2);
/// ```
#[derive(Clone)]
pub struct Command<O: OptionId> {
    pub(crate) header: String,
    footer: String,
    flags: Vec<FlagDef<O>>,
    subcommands: Vec<SubcommandDef<O>>,
    arguments: Vec<ArgumentDef<O>>,
}

impl<O: OptionId> Command<O> {
    /// Starts a command whose `header` names the program in usage text and
    /// prefixes every error message.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: String::new(),
            flags: Vec::new(),
            subcommands: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// Free-form text appended after the usage line.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = text.into();
        self
    }

    /// Registers a flag.
    ///
    /// # Panics
    ///
    /// Panics when the flag has no name at all, reuses a short or long name
    /// already registered, or reuses an identifier.
    pub fn flag<T: Clone + Send + Sync + 'static>(mut self, flag: Flag<O, T>) -> Self {
        let def = flag.into_def();
        assert!(
            !def.shorts.is_empty() || !def.longs.is_empty(),
            "flag {:?} has no short or long name",
            def.id,
        );
        for &short in &def.shorts {
            assert!(
                !self
                    .flags
                    .iter()
                    .any(|f| f.shorts.contains(&short)),
                "duplicate short name -{short}",
            );
        }
        for long in &def.longs {
            assert!(
                !self.flags.iter().any(|f| f.longs.contains(long)),
                "duplicate long name --{long}",
            );
        }
        self.assert_new_id(def.id);
        self.flags.push(def);
        self
    }

    /// Registers a subcommand reachable as `name`.
    ///
    /// The subcommand's own identifier type `P` is independent of `O`.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate subcommand name or a reused identifier.
    pub fn subcommand<P: OptionId>(
        mut self,
        id: O,
        name: impl Into<String>,
        help: impl Into<String>,
        command: Command<P>,
    ) -> Self {
        let name = name.into();
        assert!(
            !self.subcommands.iter().any(|s| s.name == name),
            "duplicate subcommand name {name}",
        );
        self.assert_new_id(id);
        let run: SubcommandRun = Arc::new(move |args, order| {
            matcher::run(&command, args, order).map(|map| Box::new(map) as Slot)
        });
        self.subcommands.push(SubcommandDef {
            id,
            name,
            help: help.into(),
            run,
        });
        self
    }

    /// Registers a positional argument; consumed in declaration order.
    ///
    /// # Panics
    ///
    /// Panics on a reused identifier.
    pub fn argument<T: Clone + Send + Sync + 'static>(mut self, arg: Arg<O, T>) -> Self {
        self.assert_new_id(arg.id);
        self.arguments.push(arg.into_def());
        self
    }

    fn assert_new_id(&self, id: O) {
        let taken = self.flags.iter().any(|f| f.id == id)
            || self.subcommands.iter().any(|s| s.id == id)
            || self.arguments.iter().any(|a| a.id == id);
        assert!(!taken, "duplicate option identifier {id:?}");
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn footer_text(&self) -> &str {
        &self.footer
    }

    pub fn flags(&self) -> &[FlagDef<O>] {
        &self.flags
    }

    pub fn subcommands(&self) -> &[SubcommandDef<O>] {
        &self.subcommands
    }

    pub fn arguments(&self) -> &[ArgumentDef<O>] {
        &self.arguments
    }

    /// Matches `args` (without the program name) in strict order.
    pub fn parse<I>(&self, args: I) -> Result<OptionMap<O>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.parse_ordered(args, ArgumentOrder::Strict)
    }

    /// Matches `args` under an explicit ordering policy.
    ///
    /// [`ArgumentOrder::Flexible`] lets flags and positionals interleave;
    /// [`ArgumentOrder::Strict`] ends flag recognition at the first
    /// positional.
    pub fn parse_ordered<I>(&self, args: I, order: ArgumentOrder) -> Result<OptionMap<O>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        matcher::run(self, &args, order)
    }

    /// Matches the process arguments, skipping the program name.
    pub fn parse_args(&self) -> Result<OptionMap<O>> {
        self.parse(std::env::args().skip(1))
    }

    /// Like [`parse_args`](Command::parse_args) with an ordering policy.
    pub fn parse_args_ordered(&self, order: ArgumentOrder) -> Result<OptionMap<O>> {
        self.parse_ordered(std::env::args().skip(1), order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Opt {
        A,
        B,
    }

    #[test]
    #[should_panic(expected = "no short or long name")]
    fn nameless_flag_rejected() {
        let _ = Command::new("cmd").flag(Flag::switch(Opt::A));
    }

    #[test]
    #[should_panic(expected = "duplicate short name -x")]
    fn duplicate_short_rejected() {
        let _ = Command::new("cmd")
            .flag(Flag::switch(Opt::A).short('x'))
            .flag(Flag::switch(Opt::B).short('x'));
    }

    #[test]
    #[should_panic(expected = "duplicate long name --same")]
    fn duplicate_long_rejected() {
        let _ = Command::new("cmd")
            .flag(Flag::switch(Opt::A).long("same"))
            .flag(Flag::switch(Opt::B).long("same"));
    }

    #[test]
    #[should_panic(expected = "duplicate option identifier A")]
    fn duplicate_id_rejected() {
        let _ = Command::new("cmd")
            .flag(Flag::switch(Opt::A).short('a'))
            .argument(Arg::scalar::<String>(Opt::A, "X"));
    }

    #[test]
    #[should_panic(expected = "duplicate subcommand name go")]
    fn duplicate_subcommand_name_rejected() {
        let _ = Command::new("cmd")
            .subcommand(Opt::A, "go", "", Command::<u8>::new("cmd go"))
            .subcommand(Opt::B, "go", "", Command::<u8>::new("cmd go"));
    }

    #[test]
    #[should_panic(expected = "default_value applies")]
    fn default_on_multi_rejected() {
        let _ = Flag::multi::<i32>(Opt::A).short('a').default_value(1);
    }
}
