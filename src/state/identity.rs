//! Club accounts, roles and the single authorization check used by every command.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    state::league::{LeagueError, PlayerId},
};

/// Identifier of a club account.
pub type UserId = String;

/// Account roles, declared from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Regular club member; the only role allowed to vote.
    Player,
    /// Runs games on match day (participants, voting window, points).
    Manager,
    /// Manages the schedule, roster and accounts.
    Admin,
    /// Owner account; the only one allowed to grant the admin role.
    MasterAdmin,
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Submit or edit a best fielder / best batter ballot.
    CastVote,
    /// Complete games, edit participants, toggle voting and assign points.
    RunGame,
    /// Create, edit, import and delete games.
    EditSchedule,
    /// Create, edit, import and delete teams and players.
    ManageRoster,
    /// Read the flat score and vote exports.
    ExportData,
    /// Read and edit other accounts, link them to players and grant the manager role.
    ManageUsers,
    /// Grant the admin role.
    PromoteAdmin,
}

impl Role {
    /// Whether this role is allowed to perform `capability`.
    pub fn permits(self, capability: Capability) -> bool {
        match capability {
            Capability::CastVote => self == Role::Player,
            Capability::RunGame => self >= Role::Manager,
            Capability::EditSchedule
            | Capability::ManageRoster
            | Capability::ExportData
            | Capability::ManageUsers => self >= Role::Admin,
            Capability::PromoteAdmin => self == Role::MasterAdmin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Player => "player",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::MasterAdmin => "master admin",
        };
        f.write_str(label)
    }
}

/// Resolved identity of whoever issues a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Account identifier.
    pub user_id: UserId,
    /// Role at the time the request was resolved.
    pub role: Role,
    /// Player record linked to the account, if any.
    pub linked_player_id: Option<PlayerId>,
}

impl Caller {
    /// Fail with [`LeagueError::Forbidden`] unless the caller's role permits `capability`.
    pub fn authorize(&self, capability: Capability) -> Result<(), LeagueError> {
        if self.role.permits(capability) {
            Ok(())
        } else {
            Err(LeagueError::Forbidden(format!(
                "{} accounts cannot perform {capability:?}",
                self.role
            )))
        }
    }

    /// Identifier recorded on ballots: the linked player when present, the account otherwise.
    pub fn voter_id(&self) -> &str {
        self.linked_player_id.as_deref().unwrap_or(&self.user_id)
    }
}

/// Club account as kept by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Login email, matched case-insensitively.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Current role.
    pub role: Role,
    /// Linked player record.
    pub player_id: Option<PlayerId>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl User {
    /// Identity view used by the engine.
    pub fn as_caller(&self) -> Caller {
        Caller {
            user_id: self.id.clone(),
            role: self.role,
            linked_player_id: self.player_id.clone(),
        }
    }
}

/// Mock account directory. Login is a lookup by email; there are no credentials.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: IndexMap<UserId, User>,
}

impl Directory {
    /// Build a directory from already persisted accounts.
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id.clone(), user)).collect(),
        }
    }

    /// Every account in registration order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Look an account up by id.
    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Resolve the caller identity for an account id.
    pub fn resolve(&self, id: &str) -> Option<Caller> {
        self.users.get(id).map(User::as_caller)
    }

    /// Find the account registered under `email`.
    pub fn login(&self, email: &str) -> Result<&User, LeagueError> {
        let needle = email.trim().to_lowercase();
        self.users
            .values()
            .find(|user| user.email.to_lowercase() == needle)
            .ok_or_else(|| LeagueError::not_found("account", email))
    }

    /// Create a new account. The very first account becomes the master admin.
    pub fn register(
        &mut self,
        email: String,
        name: String,
        phone: Option<String>,
        created_at: String,
    ) -> Result<User, LeagueError> {
        let email = email.trim().to_string();
        if email.is_empty() || name.trim().is_empty() {
            return Err(LeagueError::Validation(
                "email and name must not be empty".into(),
            ));
        }
        if self.login(&email).is_ok() {
            return Err(LeagueError::Conflict(format!(
                "email `{email}` is already in use"
            )));
        }

        let role = if self.users.is_empty() {
            Role::MasterAdmin
        } else {
            Role::Player
        };
        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            email,
            name,
            phone,
            role,
            player_id: None,
            created_at,
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    /// Look an account up for `caller`: their own account, or any account with `ManageUsers`.
    pub fn user_for(&self, caller: &Caller, user_id: &str) -> Result<&User, LeagueError> {
        authorize_self_or(caller, user_id)?;
        self.users
            .get(user_id)
            .ok_or_else(|| LeagueError::not_found("account", user_id))
    }

    /// Link an account to a player record.
    ///
    /// Players link their own account; linking someone else's needs `ManageUsers`. A player
    /// record backs at most one account, since ballots are keyed by the linked player.
    pub fn link_player(
        &mut self,
        caller: &Caller,
        user_id: &str,
        player_id: PlayerId,
    ) -> Result<User, LeagueError> {
        authorize_self_or(caller, user_id)?;
        let owner = self.users.values().find(|user| {
            user.id != user_id && user.player_id.as_deref() == Some(player_id.as_str())
        });
        if let Some(owner) = owner {
            return Err(LeagueError::Conflict(format!(
                "player `{player_id}` is already linked to account `{}`",
                owner.id
            )));
        }

        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| LeagueError::not_found("account", user_id))?;
        user.player_id = Some(player_id);
        Ok(user.clone())
    }

    /// Clear every link to a removed player and return the accounts that changed.
    pub fn unlink_player(&mut self, player_id: &str) -> Vec<User> {
        self.users
            .values_mut()
            .filter(|user| user.player_id.as_deref() == Some(player_id))
            .map(|user| {
                user.player_id = None;
                user.clone()
            })
            .collect()
    }

    /// Edit the contact details of an account.
    ///
    /// `None` keeps the current value; an empty phone clears it. Emails stay unique across
    /// the directory.
    pub fn update_profile(
        &mut self,
        caller: &Caller,
        user_id: &str,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<User, LeagueError> {
        authorize_self_or(caller, user_id)?;
        if !self.users.contains_key(user_id) {
            return Err(LeagueError::not_found("account", user_id));
        }

        let email = match email.map(|email| email.trim().to_string()) {
            Some(email) if email.is_empty() => {
                return Err(LeagueError::Validation("email must not be empty".into()));
            }
            Some(email) => {
                if self.login(&email).is_ok_and(|owner| owner.id != user_id) {
                    return Err(LeagueError::Conflict(format!(
                        "email `{email}` is already in use"
                    )));
                }
                Some(email)
            }
            None => None,
        };

        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| LeagueError::not_found("account", user_id))?;
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(phone) = phone {
            let phone = phone.trim();
            user.phone = (!phone.is_empty()).then(|| phone.to_string());
        }
        Ok(user.clone())
    }

    /// Change an account's role.
    ///
    /// Managers and players can be set by any admin; granting admin needs the master admin.
    /// The master admin role can neither be granted nor taken away.
    pub fn set_role(&mut self, caller: &Caller, user_id: &str, role: Role) -> Result<User, LeagueError> {
        caller.authorize(Capability::ManageUsers)?;
        if role == Role::Admin {
            caller.authorize(Capability::PromoteAdmin)?;
        }
        if role == Role::MasterAdmin {
            return Err(LeagueError::Conflict(
                "the master admin role cannot be granted".into(),
            ));
        }

        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| LeagueError::not_found("account", user_id))?;
        if user.role == Role::MasterAdmin {
            return Err(LeagueError::Conflict(
                "the master admin account cannot change role".into(),
            ));
        }
        user.role = role;
        Ok(user.clone())
    }
}

fn authorize_self_or(caller: &Caller, user_id: &str) -> Result<(), LeagueError> {
    if caller.user_id == user_id {
        Ok(())
    } else {
        caller.authorize(Capability::ManageUsers)
    }
}

impl From<UserEntity> for User {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
            phone: value.phone,
            role: value.role,
            player_id: value.player_id,
            created_at: value.created_at,
        }
    }
}

impl From<User> for UserEntity {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
            phone: value.phone,
            role: value.role,
            player_id: value.player_id,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str, role: Role, player_id: Option<&str>) -> User {
        User {
            id: id.into(),
            email: email.into(),
            name: id.into(),
            phone: None,
            role,
            player_id: player_id.map(Into::into),
            created_at: "2023-01-01T00:00:00Z".into(),
        }
    }

    fn directory() -> Directory {
        Directory::new([
            user("1", "admin@club.test", Role::MasterAdmin, None),
            user("2", "manager@club.test", Role::Manager, None),
            user("3", "mike@club.test", Role::Player, Some("p1")),
            user("4", "ops@club.test", Role::Admin, None),
        ])
    }

    #[test]
    fn roles_follow_privilege_order() {
        assert!(Role::Manager.permits(Capability::RunGame));
        assert!(Role::MasterAdmin.permits(Capability::RunGame));
        assert!(!Role::Player.permits(Capability::RunGame));
        assert!(!Role::Manager.permits(Capability::EditSchedule));
        assert!(Role::Admin.permits(Capability::ManageRoster));
        assert!(!Role::Admin.permits(Capability::PromoteAdmin));
        assert!(Role::MasterAdmin.permits(Capability::PromoteAdmin));
    }

    #[test]
    fn only_players_vote() {
        assert!(Role::Player.permits(Capability::CastVote));
        for role in [Role::Manager, Role::Admin, Role::MasterAdmin] {
            assert!(!role.permits(Capability::CastVote), "{role} must not vote");
        }
    }

    #[test]
    fn voter_id_prefers_linked_player() {
        let dir = directory();
        assert_eq!(dir.resolve("3").unwrap().voter_id(), "p1");
        assert_eq!(dir.resolve("2").unwrap().voter_id(), "2");
    }

    #[test]
    fn login_is_case_insensitive() {
        let dir = directory();
        assert_eq!(dir.login("MIKE@club.test").unwrap().id, "3");
        assert!(matches!(
            dir.login("nobody@club.test"),
            Err(LeagueError::NotFound { .. })
        ));
    }

    #[test]
    fn first_registration_becomes_master_admin() {
        let mut dir = Directory::default();
        let first = dir
            .register("a@club.test".into(), "A".into(), None, "now".into())
            .unwrap();
        let second = dir
            .register("b@club.test".into(), "B".into(), None, "now".into())
            .unwrap();
        assert_eq!(first.role, Role::MasterAdmin);
        assert_eq!(second.role, Role::Player);

        let err = dir
            .register("B@club.test".into(), "B again".into(), None, "now".into())
            .unwrap_err();
        assert!(matches!(err, LeagueError::Conflict(_)));
    }

    #[test]
    fn admin_grant_requires_master_admin() {
        let mut dir = directory();
        let admin = dir.resolve("4").unwrap();
        let master = dir.resolve("1").unwrap();

        let err = dir.set_role(&admin, "2", Role::Admin).unwrap_err();
        assert!(matches!(err, LeagueError::Forbidden(_)));

        assert_eq!(dir.set_role(&admin, "3", Role::Manager).unwrap().role, Role::Manager);
        assert_eq!(dir.set_role(&master, "2", Role::Admin).unwrap().role, Role::Admin);
    }

    #[test]
    fn master_admin_cannot_be_demoted() {
        let mut dir = directory();
        let admin = dir.resolve("4").unwrap();
        let err = dir.set_role(&admin, "1", Role::Player).unwrap_err();
        assert!(matches!(err, LeagueError::Conflict(_)));
    }

    #[test]
    fn linking_someone_else_requires_manage_users() {
        let mut dir = directory();
        let manager = dir.resolve("2").unwrap();
        let admin = dir.resolve("4").unwrap();

        assert!(matches!(
            dir.link_player(&manager, "4", "p9".into()),
            Err(LeagueError::Forbidden(_))
        ));
        let linked = dir.link_player(&admin, "2", "p9".into()).unwrap();
        assert_eq!(linked.player_id.as_deref(), Some("p9"));
    }

    #[test]
    fn players_link_their_own_account() {
        let mut dir = directory();
        let rookie = dir
            .register("rookie@club.test".into(), "Rookie".into(), None, "now".into())
            .unwrap();
        let me = rookie.as_caller();

        let linked = dir.link_player(&me, &rookie.id, "p4".into()).unwrap();
        assert_eq!(linked.player_id.as_deref(), Some("p4"));
        assert_eq!(dir.resolve(&rookie.id).unwrap().voter_id(), "p4");

        assert!(matches!(
            dir.link_player(&me, "2", "p5".into()),
            Err(LeagueError::Forbidden(_))
        ));
    }

    #[test]
    fn a_player_backs_a_single_account() {
        let mut dir = directory();
        let admin = dir.resolve("4").unwrap();

        let err = dir.link_player(&admin, "2", "p1".into()).unwrap_err();
        assert!(matches!(err, LeagueError::Conflict(_)));

        let me = dir.resolve("3").unwrap();
        assert_eq!(
            dir.link_player(&me, "3", "p1".into()).unwrap().player_id.as_deref(),
            Some("p1")
        );
    }

    #[test]
    fn unlinking_clears_every_account_of_the_player() {
        let mut dir = directory();
        let changed = dir.unlink_player("p1");
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, "3");
        assert_eq!(dir.resolve("3").unwrap().linked_player_id, None);
        assert!(dir.unlink_player("p1").is_empty());
    }

    #[test]
    fn profile_edits_keep_emails_unique() {
        let mut dir = directory();
        let me = dir.resolve("3").unwrap();

        let updated = dir
            .update_profile(&me, "3", Some(" mike@new.test ".into()), Some("555-0101".into()))
            .unwrap();
        assert_eq!(updated.email, "mike@new.test");
        assert_eq!(updated.phone.as_deref(), Some("555-0101"));

        let cleared = dir.update_profile(&me, "3", None, Some(String::new())).unwrap();
        assert_eq!(cleared.email, "mike@new.test");
        assert_eq!(cleared.phone, None);

        let err = dir
            .update_profile(&me, "3", Some("ADMIN@club.test".into()), None)
            .unwrap_err();
        assert!(matches!(err, LeagueError::Conflict(_)));
        assert!(dir.update_profile(&me, "3", Some("MIKE@new.test".into()), None).is_ok());
    }

    #[test]
    fn profiles_of_others_need_manage_users() {
        let mut dir = directory();
        let me = dir.resolve("3").unwrap();
        let admin = dir.resolve("4").unwrap();

        assert!(matches!(
            dir.update_profile(&me, "2", None, Some("1".into())),
            Err(LeagueError::Forbidden(_))
        ));
        assert!(matches!(dir.user_for(&me, "2"), Err(LeagueError::Forbidden(_))));
        assert_eq!(dir.user_for(&me, "3").unwrap().id, "3");
        assert_eq!(
            dir.update_profile(&admin, "2", None, Some("555".into())).unwrap().phone.as_deref(),
            Some("555")
        );
        assert!(matches!(
            dir.user_for(&admin, "missing"),
            Err(LeagueError::NotFound { .. })
        ));
    }
}
