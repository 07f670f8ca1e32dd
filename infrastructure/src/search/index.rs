//! In-memory nearest-neighbour index over board games.

use super::embedding::{cosine_similarity, embed};
use crate::storage::{CafeDatabase, GameRecord, StorageError};
use cafe_domain::GameMatch;
use tracing::debug;

/// Upper bound on results per search.
pub const MAX_RESULTS: usize = 15;

struct IndexedGame {
    game: GameRecord,
    vector: Vec<f32>,
}

/// Precomputed embeddings for every board game.
pub struct GameSearchIndex {
    entries: Vec<IndexedGame>,
}

impl GameSearchIndex {
    pub fn build(games: Vec<GameRecord>) -> Self {
        let entries = games
            .into_iter()
            .map(|game| {
                let vector = embed(&document(&game));
                IndexedGame { game, vector }
            })
            .collect();
        Self { entries }
    }

    /// Index the current `board_games` table.
    pub fn from_database(db: &CafeDatabase) -> Result<Self, StorageError> {
        let index = Self::build(db.games()?);
        debug!(games = index.len(), "Built game search index");
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `n` games by similarity to `query`; `n` is clamped to `1..=MAX_RESULTS`.
    pub fn search(&self, query: &str, n: usize) -> Vec<GameMatch> {
        let query_vector = embed(query);
        let mut scored: Vec<(f32, &GameRecord)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(&query_vector, &e.vector), &e.game))
            .collect();
        // Stable sort keeps catalog order among ties
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored
            .into_iter()
            .take(n.clamp(1, MAX_RESULTS))
            .map(|(score, game)| GameMatch {
                name: game.name.clone(),
                category: game.category.clone(),
                price: game.price,
                in_stock: game.in_stock,
                relevance: (f64::from(score) * 1000.0).round() / 1000.0,
            })
            .collect()
    }
}

fn document(game: &GameRecord) -> String {
    format!("{} - {} game", game.name, game.category)
}
