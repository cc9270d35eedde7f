//! Filter graph chains (`-vf` / `-af`).

use crate::options::{CmdOption, Item};

/// A linear chain of filters rendered as one valued option.
///
/// Filters keep the order they were pushed in, since that is the order
/// the graph applies them.
///
/// ```
/// use ffmpegwrapper_av::{FilterChain, Output, Tokens};
///
/// let mut chain = FilterChain::video();
/// chain.push_with("scale", [("w", "1280"), ("h", "-2")]).push("hflip");
///
/// let output = Output::with_items("out.mp4", [chain]);
/// let tokens: Vec<&str> = output.tokens().collect();
/// assert_eq!(tokens, ["-vf", "scale=w=1280:h=-2,hflip", "out.mp4"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    flag: &'static str,
    filters: Vec<String>,
}

impl FilterChain {
    /// Chain for the video filter graph.
    pub fn video() -> Self {
        Self {
            flag: "-vf",
            filters: Vec::new(),
        }
    }

    /// Chain for the audio filter graph.
    pub fn audio() -> Self {
        Self {
            flag: "-af",
            filters: Vec::new(),
        }
    }

    /// Append a filter given in ffmpeg's own syntax.
    pub fn push(&mut self, filter: impl Into<String>) -> &mut Self {
        self.filters.push(filter.into());
        self
    }

    /// Append a filter with `key=value` parameters joined by `:`.
    pub fn push_with<'a, P>(&mut self, name: &str, params: P) -> &mut Self
    where
        P: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let params: Vec<String> = params
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();

        if params.is_empty() {
            self.filters.push(name.to_string());
        } else {
            self.filters.push(format!("{name}={}", params.join(":")));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Render the chain as the option it will be emitted as.
    pub fn to_option(&self) -> CmdOption {
        CmdOption::valued(self.flag, self.filters.join(","))
    }
}

impl From<FilterChain> for Item {
    fn from(chain: FilterChain) -> Self {
        Item::Option(chain.to_option())
    }
}
