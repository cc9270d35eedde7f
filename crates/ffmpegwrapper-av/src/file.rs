//! Input and output file stores.

use crate::options::{Item, OptionStore, Tokens};

/// Options that apply to one input file, followed by `-i <path>`.
///
/// The path is not checked; a missing file is reported by ffmpeg itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    path: String,
    store: OptionStore,
}

impl Input {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            store: OptionStore::new(),
        }
    }

    /// Create an input whose options are given up front, in order.
    pub fn with_items<I>(path: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        Self {
            path: path.into(),
            store: OptionStore::with_items(items),
        }
    }

    /// Insert an option at the front of this input's options.
    pub fn add_option(&mut self, flag: impl Into<String>, value: Option<&str>) -> &mut Self {
        self.store.add_option(flag, value);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> &OptionStore {
        &self.store
    }
}

impl Tokens for Input {
    fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.store.tokens().chain(["-i", self.path.as_str()]))
    }
}

/// Options that apply to one output file, followed by the bare path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    path: String,
    store: OptionStore,
}

impl Output {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            store: OptionStore::new(),
        }
    }

    /// Create an output whose options are given up front, in order.
    pub fn with_items<I>(path: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        Self {
            path: path.into(),
            store: OptionStore::with_items(items),
        }
    }

    /// Insert an option at the front of this output's options.
    pub fn add_option(&mut self, flag: impl Into<String>, value: Option<&str>) -> &mut Self {
        self.store.add_option(flag, value);
        self
    }

    /// Overwrite the file if it already exists (`-y`).
    ///
    /// Calling this twice emits `-y` twice.
    pub fn overwrite(&mut self) -> &mut Self {
        self.add_option("-y", None)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> &OptionStore {
        &self.store
    }
}

impl Tokens for Output {
    fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.store.tokens().chain(std::iter::once(self.path.as_str())))
    }
}
