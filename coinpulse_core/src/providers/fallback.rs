use anyhow::{anyhow, Result};
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

use super::{
    coins::dto::CoinFallbackTable, insight::dto::InsightFallbackTable,
    meme::dto::MemeFallbackTable, news::dto::NewsFallbackTable,
};

/// Static substitutes for every section, shared read-only by the providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackTables {
    pub coins: CoinFallbackTable,
    pub news: NewsFallbackTable,
    pub insight: InsightFallbackTable,
    pub meme: MemeFallbackTable,
}

impl FallbackTables {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read fallback table {}: {}", path.display(), e))?;

        Self::parse(&content)
            .map_err(|e| anyhow!("Failed to parse fallback table {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let tables: FallbackTables = from_str(content)?;

        if tables.meme.memes.is_empty() {
            return Err(anyhow!("meme table must contain at least one meme"));
        }
        if tables.insight.templates.is_empty() {
            return Err(anyhow!("insight table must contain at least one template"));
        }

        Ok(tables)
    }

    pub fn into_shared(
        self,
    ) -> (
        Arc<CoinFallbackTable>,
        Arc<NewsFallbackTable>,
        Arc<InsightFallbackTable>,
        Arc<MemeFallbackTable>,
    ) {
        (
            Arc::new(self.coins),
            Arc::new(self.news),
            Arc::new(self.insight),
            Arc::new(self.meme),
        )
    }
}
