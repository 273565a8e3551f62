//! Pure state transitions for an article's engagement sets.
//!
//! Nothing here touches the database: callers load the current sets,
//! apply a transition, and persist the result themselves.

use std::{collections::HashSet, error::Error, fmt, str::FromStr};
use uuid::Uuid;

/// A vote action requested by a user. Anything other than the two
/// recognized names is rejected at parse time, before any state is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Upvote,
    Downvote,
}

/// Which engagement set a query is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementKind {
    Upvoters,
    Downvoters,
    BlockedBy,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnrecognizedInput {
    pub what: &'static str,
    pub got: String,
}

impl fmt::Display for UnrecognizedInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized {}: {}", self.what, self.got)
    }
}

impl Error for UnrecognizedInput {}

impl FromStr for VoteType {
    type Err = UnrecognizedInput;

    fn from_str(s: &str) -> Result<VoteType, UnrecognizedInput> {
        match s {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            other => Err(UnrecognizedInput {
                what: "vote type",
                got: other.to_string(),
            }),
        }
    }
}

impl FromStr for EngagementKind {
    type Err = UnrecognizedInput;

    fn from_str(s: &str) -> Result<EngagementKind, UnrecognizedInput> {
        match s {
            "upvoters" => Ok(EngagementKind::Upvoters),
            "downvoters" => Ok(EngagementKind::Downvoters),
            "blockedBy" => Ok(EngagementKind::BlockedBy),
            other => Err(UnrecognizedInput {
                what: "engagement kind",
                got: other.to_string(),
            }),
        }
    }
}

/// The three engagement sets of one article.
///
/// Invariant: a user id is in at most one of `up_votes`/`down_votes`.
/// `blocked_by` is independent of the vote sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Engagement {
    pub up_votes: HashSet<Uuid>,
    pub down_votes: HashSet<Uuid>,
    pub blocked_by: HashSet<Uuid>,
}

impl Engagement {
    pub fn from_sets(
        up_votes: &[Uuid],
        down_votes: &[Uuid],
        blocked_by: &[Uuid],
    ) -> Engagement {
        Engagement {
            up_votes: up_votes.iter().cloned().collect(),
            down_votes: down_votes.iter().cloned().collect(),
            blocked_by: blocked_by.iter().cloned().collect(),
        }
    }

    /// Apply one vote action. Votes are toggles: repeating a vote
    /// retracts it, casting the opposite vote switches it.
    pub fn apply_vote(&mut self, user: Uuid, vote: VoteType) {
        let had_upvoted = self.up_votes.remove(&user);
        let had_downvoted = self.down_votes.remove(&user);

        match vote {
            VoteType::Upvote if !had_upvoted => {
                self.up_votes.insert(user);
            }
            VoteType::Downvote if !had_downvoted => {
                self.down_votes.insert(user);
            }
            _ => (),
        }
    }

    /// Hide this article from `user`'s feed. Blocking twice is a no-op;
    /// there is no unblock.
    pub fn apply_block(&mut self, user: Uuid) {
        self.blocked_by.insert(user);
    }

    pub fn members(&self, kind: EngagementKind) -> &HashSet<Uuid> {
        match kind {
            EngagementKind::Upvoters => &self.up_votes,
            EngagementKind::Downvoters => &self.down_votes,
            EngagementKind::BlockedBy => &self.blocked_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn voting_twice_retracts_the_vote() {
        let user = uid();
        let mut state = Engagement::default();
        state.apply_vote(user, VoteType::Upvote);
        state.apply_vote(user, VoteType::Upvote);
        assert_eq!(state, Engagement::default());

        state.apply_vote(user, VoteType::Downvote);
        state.apply_vote(user, VoteType::Downvote);
        assert_eq!(state, Engagement::default());
    }

    #[test]
    fn opposite_vote_switches_membership() {
        let user = uid();
        let mut state = Engagement::default();
        state.apply_vote(user, VoteType::Upvote);
        state.apply_vote(user, VoteType::Downvote);
        assert!(!state.up_votes.contains(&user));
        assert!(state.down_votes.contains(&user));
    }

    #[test]
    fn downvote_replaces_existing_upvote() {
        let user = uid();
        let mut state = Engagement::from_sets(&[user], &[], &[]);
        state.apply_vote(user, VoteType::Downvote);
        assert!(state.up_votes.is_empty());
        assert_eq!(state.down_votes.len(), 1);
        assert!(state.down_votes.contains(&user));
    }

    #[test]
    fn vote_sets_never_share_a_member() {
        let users = [uid(), uid(), uid()];
        let mut state = Engagement::default();
        let script = [
            (0, VoteType::Upvote),
            (1, VoteType::Downvote),
            (0, VoteType::Downvote),
            (2, VoteType::Upvote),
            (1, VoteType::Downvote),
            (0, VoteType::Upvote),
            (2, VoteType::Downvote),
        ];
        for &(i, vote) in script.iter() {
            state.apply_vote(users[i], vote);
            assert!(
                state.up_votes.is_disjoint(&state.down_votes),
                "after {:?} by user {}",
                vote,
                i
            );
        }
    }

    #[test]
    fn voting_does_not_touch_blocks() {
        let user = uid();
        let mut state = Engagement::default();
        state.apply_block(user);
        state.apply_vote(user, VoteType::Upvote);
        state.apply_vote(user, VoteType::Upvote);
        assert!(state.blocked_by.contains(&user));
    }

    #[test]
    fn blocking_keeps_an_existing_vote() {
        let user = uid();
        let mut state = Engagement::default();
        state.apply_vote(user, VoteType::Downvote);
        state.apply_block(user);
        assert!(state.down_votes.contains(&user));
        assert!(state.blocked_by.contains(&user));
    }

    #[test]
    fn empty_sets_have_no_members() {
        let state = Engagement::default();
        assert!(state.members(EngagementKind::Upvoters).is_empty());
        assert!(state.members(EngagementKind::Downvoters).is_empty());
        assert!(state.members(EngagementKind::BlockedBy).is_empty());
    }

    #[test]
    fn block_is_idempotent() {
        let user = uid();
        let mut once = Engagement::default();
        once.apply_block(user);
        let mut twice = once.clone();
        twice.apply_block(user);
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_vote_type_is_rejected() {
        assert!("like".parse::<VoteType>().is_err());
        assert!("UPVOTE".parse::<VoteType>().is_err());
        assert_eq!("upvote".parse::<VoteType>(), Ok(VoteType::Upvote));
        assert_eq!("downvote".parse::<VoteType>(), Ok(VoteType::Downvote));
    }

    #[test]
    fn unknown_engagement_kind_is_rejected() {
        assert!("blockers".parse::<EngagementKind>().is_err());
        assert_eq!(
            "blockedBy".parse::<EngagementKind>(),
            Ok(EngagementKind::BlockedBy)
        );
        assert_eq!(
            "upvoters".parse::<EngagementKind>(),
            Ok(EngagementKind::Upvoters)
        );
        assert_eq!(
            "downvoters".parse::<EngagementKind>(),
            Ok(EngagementKind::Downvoters)
        );
    }
}
