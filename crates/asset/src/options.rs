//! Knobs for a single mesh load.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// What to do with a face corner that leaves its texcoord or normal field empty
/// (`5//2`, `5/3`, `5`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MissingAttribute {
    /// Treat the absent index as 0, aliasing onto the first raw record.
    /// Existing assets rely on this.
    #[default]
    AliasFirst,
    /// Keep the index absent and emit a fallback value
    /// (uv `[0, 0]`, normal `[0, 0, 1]`).
    Fallback,
}

impl MissingAttribute {
    /// Parses the CLI spelling: `alias` or `fallback`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "alias" | "alias-first" => Some(Self::AliasFirst),
            "fallback" => Some(Self::Fallback),
            _ => None,
        }
    }
}

/// Cooperative cancellation flag, checked by the loader between lines.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub missing: MissingAttribute,
    pub cancel: Option<CancelToken>,
}

impl LoadOptions {
    pub fn with_missing(mut self, missing: MissingAttribute) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}
