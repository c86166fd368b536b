//! Error type for keyed accessors.

use thiserror::Error;

/// Errors returned by [`LinkedHashMap`](crate::LinkedHashMap) accessors.
///
/// Absent keys are reported through `Option` everywhere except the checked
/// accessor [`at`](crate::LinkedHashMap::at), which returns this error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("key does not exist")]
    KeyNotFound,
}
