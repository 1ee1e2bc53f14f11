//! Small shared rendering helpers.

pub mod fmt;
