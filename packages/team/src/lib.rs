#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Team directory abstraction for `prassign`.

mod directory;
mod service;

pub use directory::TeamDirectory;
pub use prassign_team_models as models;
pub use prassign_team_models::{Team, TeamError};
pub use service::TeamService;
