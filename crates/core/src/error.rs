//! Error types for the banner rotation core
//!
//! We use `thiserror` for automatic `Display`/`Error` implementations, the
//! same way the rest of this workspace's crates do.
//!
//! ### Error categories
//!
//! - [`Error::EmptyRotations`] / [`Error::NotFound`]: client-visible.
//! - [`Error::ArmOutOfRange`] / [`Error::InvalidReward`] /
//!   [`Error::InvalidArms`] / [`Error::InvalidLength`]: programmer errors,
//!   reachable only from the [selector](../banner_algorithm) tests.
//! - [`Error::Cancelled`]: surfaced as protocol cancellation by transports.
//! - [`Error::Storage`]: wraps any lower-level I/O error from a store,
//!   carrying the context string that names the operation that failed.

use std::fmt;

use thiserror::Error;

/// Result type alias for banner rotation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the banner rotation core.
#[derive(Debug, Error)]
pub enum Error {
    /// `SelectBanner` invoked on a slot with no banners.
    #[error("rotations list can't be empty")]
    EmptyRotations,

    /// `FindOneByBannerID`, or a store's `Remove`, addressed an absent record.
    #[error("not found")]
    NotFound,

    /// Selector construction or `Update` called with a mismatched index.
    #[error("arm index {index} out of range for {len} arms")]
    ArmOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of arms actually present.
        len: usize,
    },

    /// `Update` called with a reward below zero.
    #[error("reward must be non-negative, got {0}")]
    InvalidReward(f64),

    /// Selector constructed with zero arms.
    #[error("arms must be greater than zero")]
    InvalidArms,

    /// Selector constructed with mismatched counts/rewards lengths.
    #[error("counts and rewards must be of equal length")]
    InvalidLength,

    /// The request's cancellation token was already cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// A storage back-end failed; `context` names the operation that was
    /// attempting the call, matching the original service's
    /// `errors.Wrap(err, "...")` convention.
    #[error("{context}: {source}")]
    Storage {
        /// Describes the operation that failed, e.g. "error when searching
        /// for rotations by slot id for banner selection".
        context: String,
        /// The underlying storage error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An already-classified error re-wrapped with an outer context string
    /// as it crosses a layer boundary (e.g. the service wrapping a store's
    /// `NotFound`). Unlike [`Error::Storage`], this preserves the original
    /// variant for classification, see [`Error::is_client_visible`] and
    /// [`Error::is_cancelled`], which see through it.
    #[error("{context}: {source}")]
    Context {
        /// Describes the operation that was attempting the call.
        context: String,
        /// The original, still-classifiable error.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps a lower-level storage error with context identifying the
    /// operation that was attempting the call.
    pub fn storage(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Storage {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Wraps `self` with an outer context string, preserving the original
    /// variant for classification (see [`Error::is_client_visible`] /
    /// [`Error::is_cancelled`]). This is how a service-layer call names the
    /// business operation it was attempting, e.g. "error when searching
    /// for rotations by slot id for banner selection", without losing the
    /// fact that the underlying failure was a [`Error::NotFound`].
    pub fn wrap(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True for errors a transport must map onto its protocol's "client
    /// error" shape (HTTP 4xx, gRPC `NOT_FOUND`/`INVALID_ARGUMENT`).
    pub fn is_client_visible(&self) -> bool {
        match self {
            Error::EmptyRotations | Error::NotFound => true,
            Error::Context { source, .. } => source.is_client_visible(),
            _ => false,
        }
    }

    /// True for a cancelled request, which transports surface as protocol
    /// cancellation rather than a generic server error.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Cancelled => true,
            Error::Context { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

/// Extension trait for wrapping an already-typed [`Result`] with an outer
/// context string as it crosses a layer boundary, without collapsing the
/// original error into an opaque [`Error::Storage`].
pub trait WrapErrorExt<T> {
    /// Wraps the error, if any, with `context` via [`Error::wrap`].
    fn wrap_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> WrapErrorExt<T> for Result<T> {
    fn wrap_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.wrap(context))
    }
}

/// Extension trait mirroring `github.com/pkg/errors`' `Wrap`: attaches a
/// context string to any result whose error implements [`std::error::Error`].
pub trait ResultExt<T> {
    /// Wraps the error, if any, as [`Error::Storage`] with the given context.
    fn context(self, context: impl fmt::Display) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl fmt::Display) -> Result<T> {
        self.map_err(|e| Error::storage(context.to_string(), e))
    }
}
