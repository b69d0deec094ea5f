use chrono::Utc;
use sled::Db;
use thiserror::Error;

use super::dto::{SectionType, UpsertedVote, Vote, VoteDraft};

const TREE_NAME: &str = "dashboard_votes";
const KEY_SEPARATOR: u8 = 0;

#[derive(Debug, Error)]
pub enum VoteStoreError {
    #[error("duplicate vote detected")]
    Duplicate,
    #[error("invalid user id")]
    InvalidUserId,
    #[error("vote storage error: {0}")]
    Storage(#[from] sled::Error),
    #[error("vote serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable votes, unique per `(user, section, content)`.
pub trait VoteStore: Send + Sync {
    /// Creates the vote or overwrites the value of the existing one.
    fn upsert_vote(&self, draft: VoteDraft) -> Result<UpsertedVote, VoteStoreError>;

    /// Votes cast by `user_id`, newest first.
    fn votes_for_user(&self, user_id: &str) -> Result<Vec<Vote>, VoteStoreError>;
}

#[derive(Clone)]
pub struct SledVoteStore {
    tree: sled::Tree,
}

impl SledVoteStore {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { tree })
    }
}

/// A user id holding the separator could reach into another user's keys.
fn user_prefix(user_id: &str) -> Result<Vec<u8>, VoteStoreError> {
    if user_id.as_bytes().contains(&KEY_SEPARATOR) {
        return Err(VoteStoreError::InvalidUserId);
    }

    let mut key = user_id.as_bytes().to_vec();
    key.push(KEY_SEPARATOR);
    Ok(key)
}

fn vote_key(
    user_id: &str,
    section_type: SectionType,
    content_id: &str,
) -> Result<Vec<u8>, VoteStoreError> {
    let mut key = user_prefix(user_id)?;
    key.extend_from_slice(section_type.as_str().as_bytes());
    key.push(KEY_SEPARATOR);
    key.extend_from_slice(content_id.as_bytes());
    Ok(key)
}

impl VoteStore for SledVoteStore {
    fn upsert_vote(&self, draft: VoteDraft) -> Result<UpsertedVote, VoteStoreError> {
        let key = vote_key(&draft.user_id, draft.section_type, &draft.content_id)?;
        let current = self.tree.get(&key)?;

        let (vote, created) = match &current {
            Some(bytes) => {
                let mut existing: Vote = serde_json::from_slice(bytes)?;
                existing.vote = draft.vote;
                existing.updated_at = Utc::now();
                (existing, false)
            }
            None => (Vote::from(draft), true),
        };

        let encoded = serde_json::to_vec(&vote)?;

        // The swap only lands if nobody wrote this key since we read it.
        match self.tree.compare_and_swap(&key, current, Some(encoded))? {
            Ok(()) => Ok(UpsertedVote { vote, created }),
            Err(_) => {
                log::warn!(
                    "Concurrent vote write for user {} on {}/{}",
                    vote.user_id,
                    vote.section_type,
                    vote.content_id
                );
                Err(VoteStoreError::Duplicate)
            }
        }
    }

    fn votes_for_user(&self, user_id: &str) -> Result<Vec<Vote>, VoteStoreError> {
        let mut votes = Vec::new();

        for result in self.tree.scan_prefix(user_prefix(user_id)?) {
            let (_, value) = result?;
            votes.push(serde_json::from_slice::<Vote>(&value)?);
        }

        votes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::votes::dto::VoteValue;
    use std::{sync::Arc, thread, time::Duration};

    fn create_test_store() -> SledVoteStore {
        let db = sled::Config::new().temporary(true).open().unwrap();
        SledVoteStore::new(&db).unwrap()
    }

    fn draft(user: &str, section: SectionType, content: &str, vote: VoteValue) -> VoteDraft {
        VoteDraft {
            user_id: user.to_string(),
            section_type: section,
            content_id: content.to_string(),
            vote,
        }
    }

    #[test]
    fn test_first_vote_is_created() {
        let store = create_test_store();
        let outcome = store
            .upsert_vote(draft("alice", SectionType::Meme, "meme-1", VoteValue::Up))
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.vote.vote, VoteValue::Up);
        assert_eq!(store.votes_for_user("alice").unwrap().len(), 1);
    }

    #[test]
    fn test_same_value_resubmission_keeps_one_row() {
        let store = create_test_store();
        let first = store
            .upsert_vote(draft("alice", SectionType::Meme, "meme-1", VoteValue::Up))
            .unwrap();
        let second = store
            .upsert_vote(draft("alice", SectionType::Meme, "meme-1", VoteValue::Up))
            .unwrap();

        assert!(!second.created);
        assert_eq!(second.vote.id, first.vote.id);

        let votes = store.votes_for_user("alice").unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].vote, VoteValue::Up);
    }

    #[test]
    fn test_changed_value_updates_in_place() {
        let store = create_test_store();
        let first = store
            .upsert_vote(draft("alice", SectionType::CoinPrices, "bitcoin", VoteValue::Up))
            .unwrap();
        let second = store
            .upsert_vote(draft("alice", SectionType::CoinPrices, "bitcoin", VoteValue::Down))
            .unwrap();

        assert!(!second.created);
        assert_eq!(second.vote.id, first.vote.id);
        assert_eq!(second.vote.created_at, first.vote.created_at);

        let votes = store.votes_for_user("alice").unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].vote, VoteValue::Down);
    }

    #[test]
    fn test_votes_are_newest_first_and_scoped_to_user() {
        let store = create_test_store();
        store
            .upsert_vote(draft("alice", SectionType::Meme, "meme-1", VoteValue::Up))
            .unwrap();
        thread::sleep(Duration::from_millis(5));
        store
            .upsert_vote(draft("alice", SectionType::MarketNews, "news-1", VoteValue::Down))
            .unwrap();
        store
            .upsert_vote(draft("alice2", SectionType::Meme, "meme-1", VoteValue::Up))
            .unwrap();

        let votes = store.votes_for_user("alice").unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].content_id, "news-1");
        assert_eq!(votes[1].content_id, "meme-1");
        assert!(votes.iter().all(|v| v.user_id == "alice"));
    }

    #[test]
    fn test_user_id_with_separator_is_rejected() {
        let store = create_test_store();
        store
            .upsert_vote(draft("a", SectionType::Meme, "meme-1", VoteValue::Up))
            .unwrap();

        assert!(matches!(
            store.votes_for_user("a\0meme"),
            Err(VoteStoreError::InvalidUserId)
        ));
        assert!(matches!(
            store.upsert_vote(draft("a\0meme", SectionType::Meme, "x", VoteValue::Down)),
            Err(VoteStoreError::InvalidUserId)
        ));

        let votes = store.votes_for_user("a").unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].vote, VoteValue::Up);
    }

    #[test]
    fn test_concurrent_submissions_never_duplicate() {
        let store = Arc::new(create_test_store());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let value = if i % 2 == 0 { VoteValue::Up } else { VoteValue::Down };
                    store.upsert_vote(draft("alice", SectionType::AiInsight, "insight-1", value))
                })
            })
            .collect();

        for handle in handles {
            match handle.join().unwrap() {
                Ok(_) | Err(VoteStoreError::Duplicate) => {}
                Err(other) => panic!("unexpected store error: {}", other),
            }
        }

        assert_eq!(store.votes_for_user("alice").unwrap().len(), 1);
    }
}
