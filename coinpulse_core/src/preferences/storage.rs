use anyhow::Result;
use sled::Db;

use super::dto::Preferences;

const TREE_NAME: &str = "user_preferences";

/// Durable per-user onboarding record.
pub trait PreferenceStore: Send + Sync {
    fn get_preferences(&self, user_id: &str) -> Result<Option<Preferences>>;

    fn set_preferences(&self, user_id: &str, preferences: &Preferences) -> Result<()>;
}

#[derive(Clone)]
pub struct SledPreferenceStore {
    tree: sled::Tree,
}

impl SledPreferenceStore {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { tree })
    }
}

impl PreferenceStore for SledPreferenceStore {
    fn get_preferences(&self, user_id: &str) -> Result<Option<Preferences>> {
        match self.tree.get(user_id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn set_preferences(&self, user_id: &str, preferences: &Preferences) -> Result<()> {
        let bytes = serde_json::to_vec(preferences)?;
        self.tree.insert(user_id, bytes)?;
        log::info!("Stored preferences for user: {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::dto::InvestorType;

    fn create_test_store() -> SledPreferenceStore {
        let db = sled::Config::new().temporary(true).open().unwrap();
        SledPreferenceStore::new(&db).unwrap()
    }

    #[test]
    fn test_missing_preferences() {
        let store = create_test_store();
        assert!(store.get_preferences("nobody").unwrap().is_none());
    }

    #[test]
    fn test_preferences_are_overwritten() {
        let store = create_test_store();
        let first = Preferences::new(
            vec!["bitcoin".to_string()],
            InvestorType::Hodler,
            vec!["Charts".to_string()],
        );
        store.set_preferences("alice", &first).unwrap();

        let second = Preferences::new(
            vec!["solana".to_string(), "cardano".to_string()],
            InvestorType::DayTrader,
            vec!["Market News".to_string()],
        );
        store.set_preferences("alice", &second).unwrap();

        let stored = store.get_preferences("alice").unwrap().unwrap();
        assert_eq!(stored, second);
        assert!(store.get_preferences("bob").unwrap().is_none());
    }
}
