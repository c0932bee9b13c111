#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Storage backends for `prassign`.
//!
//! Both backends implement `UserDirectory`, `TeamDirectory` and
//! `PullRequestStore` over the same three tables:
//!
//! ```text
//! teams(team_name PK)
//! users(user_id PK, username, team_name, is_active)
//! pull_requests(pull_request_id PK, pull_request_name, author_id, status,
//!               assigned_reviewers text[], created_at, merged_at)
//! ```

mod memory;
mod postgres;

pub use memory::MemoryStorage;
pub use postgres::{PostgresStorage, PostgresStorageError};
