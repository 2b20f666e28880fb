//! Concrete providers behind the service traits.

pub mod github;
