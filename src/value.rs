use std::any::Any;
use std::str::FromStr;
use std::sync::Arc;

/// How a flag or positional stores whatever the user types.
///
/// The kind decides both the token grammar (does `--name` take a value, is
/// the value optional, may it repeat) and the concrete type held in the
/// result map: `Switch` stores `()`, `Scalar` stores `T`, `Optional` stores
/// `Option<T>`, `Multi` stores `Vec<T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Switch,
    Scalar,
    Optional,
    Multi,
}

/// Type-erased storage cell in an [`OptionMap`](crate::OptionMap).
pub(crate) type Slot = Box<dyn Any + Send + Sync>;

/// Shared text-to-value conversion used by flags and positionals.
///
/// Returns `None` when the text does not decode; the matcher turns that into
/// an `invalid argument` error naming the token the user typed.
pub type DecodeFn<T> = Arc<dyn Fn(&str) -> Option<T> + Send + Sync>;

pub(crate) fn default_decoder<T>() -> DecodeFn<T>
where
    T: FromStr + Send + Sync + 'static,
{
    Arc::new(|text| text.parse::<T>().ok())
}

/// Builds a decoder that parses via [`FromStr`] and then checks a predicate.
///
/// ```
/// use optmap::{Command, Flag, predicate};
///
/// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
/// enum Opt {
///     Level,
/// }
///
/// let cmd = Command::new("tool").flag(
///     Flag::scalar_with(Opt::Level, predicate(|n: &u32| *n <= 9))
///         .short('l')
///         .placeholder("N"),
/// );
/// assert!(cmd.parse(["-l", "12"]).is_err());
/// ```
pub fn predicate<T, F>(pred: F) -> impl Fn(&str) -> Option<T> + Send + Sync + 'static
where
    T: FromStr + Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    move |text| text.parse::<T>().ok().filter(|value| pred(value))
}

/// Kind-specific behavior behind a flag or positional definition.
///
/// One implementation per [`ValueKind`]; `Command` holds these as
/// `Arc<dyn Binding>` so definitions with different payload types can live in
/// the same list.
pub(crate) trait Binding: Send + Sync {
    fn kind(&self) -> ValueKind;

    /// Slot pre-populated before any token is read, if a default was given.
    fn default_slot(&self) -> Option<Slot> {
        None
    }

    /// Decode `text` into the slot. Returns false when decoding fails.
    fn store_text(&self, slot: &mut Option<Slot>, text: &str) -> bool;

    /// Record an occurrence that carries no value.
    fn store_empty(&self, slot: &mut Option<Slot>);
}

pub(crate) struct SwitchBinding;

impl Binding for SwitchBinding {
    fn kind(&self) -> ValueKind {
        ValueKind::Switch
    }

    fn store_text(&self, _slot: &mut Option<Slot>, _text: &str) -> bool {
        false
    }

    fn store_empty(&self, slot: &mut Option<Slot>) {
        *slot = Some(Box::new(()));
    }
}

pub(crate) struct ScalarBinding<T> {
    pub decode: DecodeFn<T>,
    pub default: Option<T>,
}

impl<T: Clone + Send + Sync + 'static> Binding for ScalarBinding<T> {
    fn kind(&self) -> ValueKind {
        ValueKind::Scalar
    }

    fn default_slot(&self) -> Option<Slot> {
        self.default
            .as_ref()
            .map(|value| Box::new(value.clone()) as Slot)
    }

    fn store_text(&self, slot: &mut Option<Slot>, text: &str) -> bool {
        match (self.decode)(text) {
            Some(value) => {
                *slot = Some(Box::new(value));
                true
            }
            None => false,
        }
    }

    fn store_empty(&self, _slot: &mut Option<Slot>) {}
}

pub(crate) struct OptionalBinding<T> {
    pub decode: DecodeFn<T>,
    pub default: Option<Option<T>>,
}

impl<T: Clone + Send + Sync + 'static> Binding for OptionalBinding<T> {
    fn kind(&self) -> ValueKind {
        ValueKind::Optional
    }

    fn default_slot(&self) -> Option<Slot> {
        self.default
            .as_ref()
            .map(|value| Box::new(value.clone()) as Slot)
    }

    fn store_text(&self, slot: &mut Option<Slot>, text: &str) -> bool {
        match (self.decode)(text) {
            Some(value) => {
                *slot = Some(Box::new(Some(value)));
                true
            }
            None => false,
        }
    }

    fn store_empty(&self, slot: &mut Option<Slot>) {
        *slot = Some(Box::new(None::<T>));
    }
}

pub(crate) struct MultiBinding<T> {
    pub decode: DecodeFn<T>,
    pub default: Option<Vec<T>>,
}

impl<T: Clone + Send + Sync + 'static> Binding for MultiBinding<T> {
    fn kind(&self) -> ValueKind {
        ValueKind::Multi
    }

    fn default_slot(&self) -> Option<Slot> {
        self.default
            .as_ref()
            .map(|values| Box::new(values.clone()) as Slot)
    }

    fn store_text(&self, slot: &mut Option<Slot>, text: &str) -> bool {
        match (self.decode)(text) {
            Some(value) => {
                let slot = slot.get_or_insert_with(|| Box::new(Vec::<T>::new()) as Slot);
                slot.downcast_mut::<Vec<T>>()
                    .expect("multi slot holds Vec<T>")
                    .push(value);
                true
            }
            None => false,
        }
    }

    fn store_empty(&self, slot: &mut Option<Slot>) {
        slot.get_or_insert_with(|| Box::new(Vec::<T>::new()) as Slot);
    }
}
