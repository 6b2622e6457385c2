//! Process-local store, lost on restart.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::dao::{
    league_store::LeagueStore,
    models::{
        GameEntity, LeagueSnapshot, PlayerEntity, ScoreEntity, StoreMutation, TeamEntity,
        UserEntity, VoteEntity,
    },
    storage::StorageResult,
};

/// Rows keyed by id, remembering the order they were first inserted in.
struct Collection<T> {
    rows: DashMap<String, (u64, T)>,
    sequence: AtomicU64,
}

impl<T: Clone> Collection<T> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    fn upsert(&self, id: String, row: T) {
        match self.rows.get_mut(&id) {
            Some(mut existing) => existing.1 = row,
            None => {
                let order = self.sequence.fetch_add(1, Ordering::Relaxed);
                self.rows.insert(id, (order, row));
            }
        }
    }

    fn remove(&self, id: &str) {
        self.rows.remove(id);
    }

    fn ordered(&self) -> Vec<T> {
        let mut rows: Vec<(u64, T)> = self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|(order, _)| *order);
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

struct MemoryInner {
    teams: Collection<TeamEntity>,
    players: Collection<PlayerEntity>,
    games: Collection<GameEntity>,
    scores: Collection<ScoreEntity>,
    votes: Collection<VoteEntity>,
    users: Collection<UserEntity>,
    /// Serializes commits so a changeset is never interleaved with another one.
    writer: Mutex<()>,
}

/// [`LeagueStore`] backed by concurrent in-memory maps.
#[derive(Clone)]
pub struct MemoryLeagueStore {
    inner: Arc<MemoryInner>,
}

impl Default for MemoryLeagueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLeagueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                teams: Collection::new(),
                players: Collection::new(),
                games: Collection::new(),
                scores: Collection::new(),
                votes: Collection::new(),
                users: Collection::new(),
                writer: Mutex::new(()),
            }),
        }
    }

    fn apply(&self, mutation: StoreMutation) {
        let inner = &self.inner;
        match mutation {
            StoreMutation::UpsertTeam(team) => inner.teams.upsert(team.id.clone(), team),
            StoreMutation::DeleteTeam(id) => inner.teams.remove(&id),
            StoreMutation::UpsertPlayer(player) => inner.players.upsert(player.id.clone(), player),
            StoreMutation::DeletePlayer(id) => inner.players.remove(&id),
            StoreMutation::UpsertGame(game) => inner.games.upsert(game.id.clone(), game),
            StoreMutation::DeleteGame(id) => inner.games.remove(&id),
            StoreMutation::UpsertScore(score) => inner.scores.upsert(score.id.clone(), score),
            StoreMutation::DeleteScore(id) => inner.scores.remove(&id),
            StoreMutation::UpsertVote(vote) => inner.votes.upsert(vote.id.clone(), vote),
            StoreMutation::DeleteVote(id) => inner.votes.remove(&id),
            StoreMutation::UpsertUser(user) => inner.users.upsert(user.id.clone(), user),
        }
    }

    fn snapshot(&self) -> LeagueSnapshot {
        let inner = &self.inner;
        LeagueSnapshot {
            teams: inner.teams.ordered(),
            players: inner.players.ordered(),
            games: inner.games.ordered(),
            scores: inner.scores.ordered(),
            votes: inner.votes.ordered(),
            users: inner.users.ordered(),
        }
    }
}

impl LeagueStore for MemoryLeagueStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> BoxFuture<'static, StorageResult<LeagueSnapshot>> {
        let store = self.clone();
        Box::pin(async move {
            let _guard = store.inner.writer.lock().await;
            Ok(store.snapshot())
        })
    }

    fn commit(&self, changes: Vec<StoreMutation>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let _guard = store.inner.writer.lock().await;
            for mutation in changes {
                store.apply(mutation);
            }
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::seed;

    #[tokio::test]
    async fn commit_then_load_keeps_insertion_order() {
        let store = MemoryLeagueStore::new();
        let seeded = seed::snapshot();
        store.commit(seeded.clone().into_mutations()).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, seeded);
    }

    #[tokio::test]
    async fn upsert_keeps_position_and_delete_removes() {
        let store = MemoryLeagueStore::new();
        let mut seeded = seed::snapshot();
        store.commit(seeded.clone().into_mutations()).await.unwrap();

        let mut game = seeded.games[0].clone();
        game.opponent = "Mets".into();
        store
            .commit(vec![
                StoreMutation::UpsertGame(game.clone()),
                StoreMutation::DeleteVote("1-1".into()),
            ])
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.games[0], game);
        seeded.votes.remove(0);
        assert_eq!(loaded.votes, seeded.votes);
    }

    #[tokio::test]
    async fn fresh_store_is_empty_and_healthy() {
        let store = MemoryLeagueStore::default();
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.health_check().await.is_ok());
    }
}
