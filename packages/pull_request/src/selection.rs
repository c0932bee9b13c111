//! Reviewer candidate pools.

use prassign_pull_request_models::MAX_REVIEWERS;
use prassign_team::Team;

use crate::RandomSource;

/// Choose up to two reviewers for a new pull request.
///
/// Candidates are active members other than the author. They are shuffled and
/// the first `MAX_REVIEWERS` are kept in shuffled order. An empty result is
/// valid.
#[must_use]
pub fn pick_reviewers(team: &Team, author_id: &str, random: &dyn RandomSource) -> Vec<String> {
    let mut candidates: Vec<String> = team
        .active_members()
        .filter(|user| user.user_id != author_id)
        .map(|user| user.user_id.clone())
        .collect();

    random.shuffle(&mut candidates);
    candidates.truncate(MAX_REVIEWERS);
    candidates
}

/// Choose a replacement for `old_reviewer_id`.
///
/// Candidates are active members that are not the departing reviewer, not
/// already in `current_reviewers` and not the pull request author.
#[must_use]
pub fn pick_replacement(
    team: &Team,
    author_id: &str,
    old_reviewer_id: &str,
    current_reviewers: &[String],
    random: &dyn RandomSource,
) -> Option<String> {
    let candidates: Vec<&str> = team
        .active_members()
        .map(|user| user.user_id.as_str())
        .filter(|id| *id != old_reviewer_id && *id != author_id)
        .filter(|id| !current_reviewers.iter().any(|assigned| assigned == id))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    Some(candidates[random.pick_index(candidates.len())].to_string())
}
