//! Common error infrastructure for tactics-core.
//!
//! Tactical operations are total: when nothing legal can be done they report
//! "no eligible action" instead of failing. The error enums that do exist
//! (`GridError`, `SpawnError`, `MoveError`, `AttackError`) describe refusals
//! at the boundary and are defined next to the operations that raise them.
//! This module holds the classification shared by all of them.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The caller can pick another action this turn.
    ///
    /// Examples: destination occupied, target out of range
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: unknown unit, spawn outside the grid
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    ///
    /// Examples: occupancy map out of sync with unit positions
    Internal,

    /// Structurally broken input; the battle cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait TacticsError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
