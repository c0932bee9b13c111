#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pull request lifecycle and reviewer assignment for `prassign`.
//!
//! `PullRequestService` owns the `OPEN -> MERGED` state machine and picks
//! reviewers from the author's team. Persistence goes through the
//! `PullRequestStore` trait, identities and membership through the user and
//! team directories, and randomness through `RandomSource` so selection can be
//! made deterministic in tests.

mod locks;
mod random;
mod selection;
mod service;
mod store;

pub use locks::KeyedLocks;
pub use prassign_pull_request_models as models;
pub use prassign_pull_request_models::{
    ErrorKind, PullRequest, PullRequestError, PullRequestShort, PullRequestStatus,
    PullRequestStoreError, ReviewerStats,
};
pub use random::{RandomSource, SeededRandom};
pub use selection::{pick_replacement, pick_reviewers};
pub use service::PullRequestService;
pub use store::PullRequestStore;
