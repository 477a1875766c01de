use super::event::GestureType;
use std::fmt;

/// Why a rebuilt recognizer could not take over an existing one.
///
/// Whenever reconciliation fails the existing recognizer has already been
/// reset, so any gesture it was tracking is aborted.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileError {
    KindMismatch {
        expected: GestureType,
        found: GestureType,
    },
    ConfigMismatch {
        gesture_type: GestureType,
    },
    ChildCountMismatch {
        expected: usize,
        found: usize,
    },
    ChildMismatch {
        index: usize,
        source: Box<ReconcileError>,
    },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::KindMismatch { expected, found } => {
                write!(f, "cannot reconcile {expected:?} recognizer from {found:?}")
            }
            ReconcileError::ConfigMismatch { gesture_type } => {
                write!(f, "{gesture_type:?} recognizer configuration changed")
            }
            ReconcileError::ChildCountMismatch { expected, found } => {
                write!(f, "sequence has {expected} children, replacement has {found}")
            }
            ReconcileError::ChildMismatch { index, source } => {
                write!(f, "sequence child {index} failed to reconcile: {source}")
            }
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::ChildMismatch { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
