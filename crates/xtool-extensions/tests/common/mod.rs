//! Common test utilities for xtool-extensions
//!
//! - Deploy directory and package source fixtures
//! - Test extensions covering each dispatch behavior

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod extensions;
pub mod fixtures;

pub use extensions::*;
pub use fixtures::*;
