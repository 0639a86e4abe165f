//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod replay;
pub(crate) mod resolutions;
