#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod error;
pub mod pr;

use std::collections::BTreeMap;

pub use error::{ErrorKind, PullRequestError, PullRequestStoreError};
pub use pr::{PullRequest, PullRequestShort, PullRequestStatus};

/// Maximum number of reviewers assigned to a single pull request.
pub const MAX_REVIEWERS: usize = 2;

/// Reviewer user id to the number of pull requests it is assigned to.
pub type ReviewerStats = BTreeMap<String, u64>;
