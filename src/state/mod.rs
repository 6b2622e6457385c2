pub mod games;
pub mod identity;
pub mod league;
pub mod phase;
pub mod roster;
mod sse;
pub mod standings;
pub mod votes;

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::warn;

use crate::{
    config::AppConfig,
    dao::{
        league_store::LeagueStore,
        models::{LeagueSnapshot, StoreMutation},
    },
    error::ServiceError,
    state::{
        identity::{Caller, Directory, User},
        league::{League, LeagueResult},
    },
};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

/// Central application state: the league engine, the account directory and the store they
/// are persisted to.
///
/// Every command runs under the write lock of the data it touches and commits its changeset
/// before the lock is released, so concurrent commands are serialized and a failed commit
/// never leaves a partially applied change in memory.
pub struct AppState {
    league: RwLock<League>,
    directory: RwLock<Directory>,
    store: Arc<dyn LeagueStore>,
    public_sse: SseHub,
    config: AppConfig,
}

impl AppState {
    /// Build the state from a loaded snapshot.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn LeagueStore>,
        snapshot: LeagueSnapshot,
    ) -> LeagueResult<SharedState> {
        let directory = Directory::new(snapshot.users.iter().cloned().map(User::from));
        let league = League::restore(snapshot)?;

        Ok(Arc::new(Self {
            league: RwLock::new(league),
            directory: RwLock::new(directory),
            store,
            public_sse: SseHub::new(config.sse_capacity()),
            config,
        }))
    }

    /// Storage backend the league is persisted to.
    pub fn store(&self) -> &Arc<dyn LeagueStore> {
        &self.store
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.public_sse
    }

    /// Run a read-only query against the league.
    pub async fn read_league<T>(&self, query: impl FnOnce(&League) -> T) -> T {
        let league = self.league.read().await;
        query(&league)
    }

    /// Shared access to the account directory.
    pub async fn directory(&self) -> RwLockReadGuard<'_, Directory> {
        self.directory.read().await
    }

    /// Resolve the identity behind an account id.
    pub async fn resolve_caller(&self, user_id: &str) -> Option<Caller> {
        self.directory.read().await.resolve(user_id)
    }

    /// Run an engine command and persist what it changed.
    ///
    /// A rejected command or a failed commit restores the league as it was before the command.
    pub async fn mutate_league<T>(
        &self,
        command: &'static str,
        apply: impl FnOnce(&mut League) -> LeagueResult<T>,
    ) -> Result<T, ServiceError> {
        let mut league = self.league.write().await;
        let before = league.clone();

        let value = match apply(&mut league) {
            Ok(value) => value,
            Err(err) => {
                *league = before;
                warn!(command, error = %err, "league command rejected");
                return Err(err.into());
            }
        };

        let changes = league.take_changes();
        self.commit(command, changes).await.inspect_err(|_| {
            *league = before;
        })?;
        Ok(value)
    }

    /// Run a directory command returning the account it changed, and persist that account.
    pub async fn mutate_directory(
        &self,
        command: &'static str,
        apply: impl FnOnce(&mut Directory) -> LeagueResult<User>,
    ) -> Result<User, ServiceError> {
        let mut directory = self.directory.write().await;
        let before = directory.clone();

        let user = match apply(&mut directory) {
            Ok(user) => user,
            Err(err) => {
                *directory = before;
                warn!(command, error = %err, "directory command rejected");
                return Err(err.into());
            }
        };

        self.commit(command, vec![StoreMutation::UpsertUser(user.clone().into())])
            .await
            .inspect_err(|_| {
                *directory = before;
            })?;
        Ok(user)
    }

    /// Run a command spanning the league and the directory, persisting both in one changeset.
    ///
    /// Locks are taken league first, then directory. `apply` returns its value with the
    /// accounts it changed.
    pub async fn mutate_league_and_directory<T>(
        &self,
        command: &'static str,
        apply: impl FnOnce(&mut League, &mut Directory) -> LeagueResult<(T, Vec<User>)>,
    ) -> Result<T, ServiceError> {
        let mut league = self.league.write().await;
        let mut directory = self.directory.write().await;
        let league_before = league.clone();
        let directory_before = directory.clone();

        let (value, users) = match apply(&mut league, &mut directory) {
            Ok(outcome) => outcome,
            Err(err) => {
                *league = league_before;
                *directory = directory_before;
                warn!(command, error = %err, "command rejected");
                return Err(err.into());
            }
        };

        let mut changes = league.take_changes();
        changes.extend(
            users
                .into_iter()
                .map(|user| StoreMutation::UpsertUser(user.into())),
        );
        if let Err(err) = self.commit(command, changes).await {
            *league = league_before;
            *directory = directory_before;
            return Err(err);
        }
        Ok(value)
    }

    async fn commit(
        &self,
        command: &'static str,
        changes: Vec<StoreMutation>,
    ) -> Result<(), ServiceError> {
        if changes.is_empty() {
            return Ok(());
        }

        let count = changes.len();
        self.store.commit(changes).await.map_err(|err| {
            warn!(
                command,
                backend = self.store.backend(),
                mutations = count,
                error = %err,
                "failed to persist changeset; rolled back"
            );
            ServiceError::from(err)
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::dao::{
        league_store::memory::MemoryLeagueStore,
        seed,
        storage::{StorageError, StorageResult},
    };

    /// Memory store whose commits can be made to fail.
    #[derive(Clone, Default)]
    pub(crate) struct FlakyStore {
        inner: MemoryLeagueStore,
        failing: Arc<AtomicBool>,
    }

    impl FlakyStore {
        pub(crate) fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl LeagueStore for FlakyStore {
        fn backend(&self) -> &'static str {
            "flaky"
        }

        fn load(&self) -> BoxFuture<'static, StorageResult<LeagueSnapshot>> {
            self.inner.load()
        }

        fn commit(&self, changes: Vec<StoreMutation>) -> BoxFuture<'static, StorageResult<()>> {
            if self.failing.load(Ordering::SeqCst) {
                return Box::pin(async {
                    Err(StorageError::unavailable(
                        "disk full".into(),
                        std::io::Error::other("disk full"),
                    ))
                });
            }
            self.inner.commit(changes)
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            if self.failing.load(Ordering::SeqCst) {
                return Box::pin(async {
                    Err(StorageError::unavailable(
                        "offline".into(),
                        std::io::Error::other("offline"),
                    ))
                });
            }
            self.inner.health_check()
        }
    }

    /// Seeded application state over a controllable store.
    pub(crate) async fn seeded_state() -> (SharedState, FlakyStore) {
        let store = FlakyStore::default();
        store.commit(seed::snapshot().into_mutations()).await.unwrap();
        let snapshot = store.load().await.unwrap();
        let state = AppState::new(AppConfig::default(), Arc::new(store.clone()), snapshot).unwrap();
        (state, store)
    }

    #[tokio::test]
    async fn commit_failure_rolls_back_memory() {
        let (state, store) = seeded_state().await;
        store.fail(true);

        let err = state
            .mutate_league("delete_game", |league| league.delete_game("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));

        let (game, scores) = state
            .read_league(|league| (league.game("1").is_ok(), league.scores().count()))
            .await;
        assert!(game);
        assert_eq!(scores, 6);
    }

    #[tokio::test]
    async fn rejected_command_persists_nothing() {
        let (state, store) = seeded_state().await;
        let before = store.load().await.unwrap();

        let err = state
            .mutate_league("open_voting", |league| league.open_voting("4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn successful_command_reaches_the_store() {
        let (state, store) = seeded_state().await;
        state
            .mutate_league("delete_game", |league| league.delete_game("1"))
            .await
            .unwrap();

        let persisted = store.load().await.unwrap();
        assert!(persisted.games.iter().all(|g| g.id != "1"));
        assert!(persisted.scores.iter().all(|s| s.game_id != "1"));
        assert!(persisted.votes.iter().all(|v| v.game_id != "1"));
        assert_eq!(persisted.votes.len(), 5);
    }

    #[tokio::test]
    async fn directory_changes_are_persisted_or_reverted() {
        let (state, store) = seeded_state().await;
        let admin = state.resolve_caller("1").await.unwrap();

        store.fail(true);
        let attempt = state
            .mutate_directory("set_role", |directory| {
                directory.set_role(&admin, "3", identity::Role::Manager)
            })
            .await;
        assert!(attempt.is_err());
        assert_eq!(state.resolve_caller("3").await.unwrap().role, identity::Role::Player);

        store.fail(false);
        state
            .mutate_directory("set_role", |directory| {
                directory.set_role(&admin, "3", identity::Role::Manager)
            })
            .await
            .unwrap();
        let persisted = store.load().await.unwrap();
        let user = persisted.users.iter().find(|u| u.id == "3").unwrap();
        assert_eq!(user.role, identity::Role::Manager);
    }

    #[tokio::test]
    async fn cross_commands_revert_both_sides_on_commit_failure() {
        let (state, store) = seeded_state().await;
        store.fail(true);

        let attempt = state
            .mutate_league_and_directory("delete_player", |league, directory| {
                league.delete_player("1")?;
                Ok(((), directory.unlink_player("1")))
            })
            .await;
        assert!(attempt.is_err());
        assert!(state.read_league(|league| league.player("1").is_ok()).await);
        assert_eq!(
            state.resolve_caller("3").await.unwrap().linked_player_id.as_deref(),
            Some("1")
        );

        store.fail(false);
        state
            .mutate_league_and_directory("delete_player", |league, directory| {
                league.delete_player("1")?;
                Ok(((), directory.unlink_player("1")))
            })
            .await
            .unwrap();
        let persisted = store.load().await.unwrap();
        assert!(persisted.players.iter().all(|p| p.id != "1"));
        let mike = persisted.users.iter().find(|u| u.id == "3").unwrap();
        assert_eq!(mike.player_id, None);
    }
}
