//! Command implementations for the nativepack binary

pub(crate) mod check;
pub(crate) mod completion;
pub(crate) mod lifecycle;
pub(crate) mod manifest;
