//! Result of a remote fetch as seen by a view.

/// Pending / failed / ready.
///
/// Keeps "the fetch failed" apart from "the fetch returned nothing": an
/// empty catalog is `Ready(vec![])`, never `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    #[default]
    Pending,
    /// The fetch failed; holds a message fit for display.
    Failed(String),
    Ready(T),
}

impl<T> LoadState<T> {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The loaded value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    /// The failure message, if the fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Pending | Self::Ready(_) => None,
        }
    }

    /// Build a state from a fetch result, rendering the error for display.
    pub fn from_result<E: core::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}
