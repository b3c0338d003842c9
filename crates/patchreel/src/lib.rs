//! patchreel library
//!
//! This module exports the command-line front end of patchreel for use in
//! integration tests and as a library.

pub mod config;
pub mod run;
