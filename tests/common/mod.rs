//! Common test infrastructure
//!
//! Tests import catalogs and entry builders from here, never from the
//! submodules directly.

mod constants;
mod fixtures;

#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{album, rating, single, usernames, TestCatalog};
