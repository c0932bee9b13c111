#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User directory abstraction for `prassign`.
//!
//! This crate defines the `UserDirectory` trait that storage backends implement
//! and the `UserService` the HTTP layer and the pull request service talk to.

mod directory;
mod service;

pub use directory::UserDirectory;
pub use prassign_user_models as models;
pub use prassign_user_models::{User, UserError};
pub use service::UserService;
