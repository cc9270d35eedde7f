//! Ordered option collections and their token grammar.
//!
//! Every building block of an ffmpeg command line implements [`Tokens`]:
//! a boolean option renders as its flag, a valued option as the flag
//! followed by the value, and a store as the concatenation of its items.

use crate::file::{Input, Output};

/// Anything that renders into command-line tokens.
///
/// The returned iterator borrows from `self`, so calling `tokens()` again
/// restarts the sequence from the beginning.
pub trait Tokens {
    /// Iterate the tokens this item contributes to the argument vector.
    fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

/// A single command-line option: a flag with an optional value.
///
/// A `None` value is a boolean flag such as `-y`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CmdOption {
    flag: String,
    value: Option<String>,
}

impl CmdOption {
    /// Create a valued or boolean option.
    pub fn new(flag: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            flag: flag.into(),
            value: value.map(str::to_string),
        }
    }

    /// Create a boolean option.
    pub fn flag(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: None,
        }
    }

    /// Create a valued option.
    pub fn valued(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: Some(value.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.flag
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Tokens for CmdOption {
    fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(std::iter::once(self.flag.as_str()).chain(self.value.as_deref()))
    }
}

/// The closed set of things a store can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Option(CmdOption),
    Store(OptionStore),
    Input(Input),
    Output(Output),
}

impl Tokens for Item {
    fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Item::Option(option) => option.tokens(),
            Item::Store(store) => store.tokens(),
            Item::Input(input) => input.tokens(),
            Item::Output(output) => output.tokens(),
        }
    }
}

impl From<CmdOption> for Item {
    fn from(option: CmdOption) -> Self {
        Item::Option(option)
    }
}

impl From<OptionStore> for Item {
    fn from(store: OptionStore) -> Self {
        Item::Store(store)
    }
}

impl From<Input> for Item {
    fn from(input: Input) -> Self {
        Item::Input(input)
    }
}

impl From<Output> for Item {
    fn from(output: Output) -> Self {
        Item::Output(output)
    }
}

/// An ordered, append-only collection of options and nested stores.
///
/// Items passed at construction keep their order. Options added later with
/// [`add_option`](Self::add_option) are inserted at the front, so the most
/// recently added option is emitted first:
///
/// ```
/// use ffmpegwrapper_av::{CmdOption, OptionStore, Tokens};
///
/// let mut store = OptionStore::with_items([
///     CmdOption::flag("-a"),
///     CmdOption::flag("-b"),
/// ]);
/// store.add_option("-c", None);
/// store.add_option("-d", None);
///
/// let tokens: Vec<&str> = store.tokens().collect();
/// assert_eq!(tokens, ["-d", "-c", "-a", "-b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStore {
    items: Vec<Item>,
}

impl OptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an initial list of items, preserving their order.
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Insert an option at the front of the store.
    ///
    /// Nothing is validated and repeated flags are kept.
    pub fn add_option(&mut self, flag: impl Into<String>, value: Option<&str>) -> &mut Self {
        self.items.insert(0, Item::Option(CmdOption::new(flag, value)));
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Tokens for OptionStore {
    fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.items.iter().flat_map(|item| item.tokens()))
    }
}
