//! Mock account directory commands.

use tracing::{info, warn};

use crate::{
    dto::{
        auth::{
            LinkPlayerRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, UserSummary,
        },
        now_rfc3339,
    },
    error::ServiceError,
    state::{
        SharedState,
        identity::{Caller, Capability, Role},
    },
};

/// Look an account up by email. There is no credential check.
pub async fn login(state: &SharedState, request: LoginRequest) -> Result<UserSummary, ServiceError> {
    let directory = state.directory().await;
    match directory.login(&request.email) {
        Ok(user) => {
            info!(user_id = %user.id, role = %user.role, "account signed in");
            Ok(UserSummary::from(user))
        }
        Err(_) => {
            warn!(email = %request.email, "login attempt for unknown account");
            Err(ServiceError::Unauthorized(format!(
                "no account registered for `{}`",
                request.email
            )))
        }
    }
}

/// Create an account. The first account of an empty directory becomes the master admin.
pub async fn register(
    state: &SharedState,
    request: RegisterRequest,
) -> Result<UserSummary, ServiceError> {
    let created_at = now_rfc3339();
    let user = state
        .mutate_directory("register", |directory| {
            directory.register(request.email, request.name, request.phone, created_at)
        })
        .await?;

    info!(user_id = %user.id, role = %user.role, "account registered");
    Ok(UserSummary::from(user))
}

/// Every account in registration order.
pub async fn list_users(
    state: &SharedState,
    caller: &Caller,
) -> Result<Vec<UserSummary>, ServiceError> {
    caller.authorize(Capability::ManageUsers)?;
    let directory = state.directory().await;
    Ok(directory.users().map(UserSummary::from).collect())
}

/// Change the role of an account.
pub async fn set_role(
    state: &SharedState,
    caller: &Caller,
    user_id: &str,
    role: Role,
) -> Result<UserSummary, ServiceError> {
    let user = state
        .mutate_directory("set_role", |directory| directory.set_role(caller, user_id, role))
        .await?;

    info!(user_id, role = %user.role, by = %caller.user_id, "role changed");
    Ok(UserSummary::from(user))
}

/// One account, visible to its owner and to user administrators.
pub async fn get_user(
    state: &SharedState,
    caller: &Caller,
    user_id: &str,
) -> Result<UserSummary, ServiceError> {
    let directory = state.directory().await;
    Ok(UserSummary::from(directory.user_for(caller, user_id)?))
}

/// Edit the email and phone of an account.
pub async fn update_profile(
    state: &SharedState,
    caller: &Caller,
    user_id: &str,
    request: UpdateProfileRequest,
) -> Result<UserSummary, ServiceError> {
    let user = state
        .mutate_directory("update_profile", |directory| {
            directory.update_profile(caller, user_id, request.email, request.phone)
        })
        .await?;

    info!(user_id, by = %caller.user_id, "profile updated");
    Ok(UserSummary::from(user))
}

/// Link an account to an existing roster player.
pub async fn link_player(
    state: &SharedState,
    caller: &Caller,
    user_id: &str,
    request: LinkPlayerRequest,
) -> Result<UserSummary, ServiceError> {
    let user = state
        .mutate_league_and_directory("link_player", |league, directory| {
            league.player(&request.player_id)?;
            let user = directory.link_player(caller, user_id, request.player_id)?;
            Ok((user.clone(), vec![user]))
        })
        .await?;

    info!(user_id, player_id = ?user.player_id, "account linked to player");
    Ok(UserSummary::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::league_store::LeagueStore, state::tests::seeded_state};

    #[tokio::test]
    async fn login_is_case_insensitive_and_rejects_strangers() {
        let (state, _store) = seeded_state().await;

        let user = login(
            &state,
            LoginRequest {
                email: "Mike@Baseball.com".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.id, "3");
        assert_eq!(user.player_id.as_deref(), Some("1"));

        let err = login(
            &state,
            LoginRequest {
                email: "nobody@baseball.com".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn registered_accounts_start_as_players() {
        let (state, store) = seeded_state().await;
        let user = register(
            &state,
            RegisterRequest {
                email: "new@baseball.com".into(),
                name: "Rookie".into(),
                phone: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(user.role, Role::Player);
        assert!(store.load().await.unwrap().users.iter().any(|u| u.id == user.id));
    }

    #[tokio::test]
    async fn linking_requires_an_existing_player() {
        let (state, _store) = seeded_state().await;
        let admin = state.resolve_caller("1").await.unwrap();

        let err = link_player(
            &state,
            &admin,
            "2",
            LinkPlayerRequest {
                player_id: "404".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let user = link_player(
            &state,
            &admin,
            "2",
            LinkPlayerRequest {
                player_id: "4".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.player_id.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn only_the_master_admin_grants_admin() {
        let (state, _store) = seeded_state().await;
        let master = state.resolve_caller("1").await.unwrap();
        set_role(&state, &master, "2", Role::Admin).await.unwrap();

        let promoted = state.resolve_caller("2").await.unwrap();
        let err = set_role(&state, &promoted, "3", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert_eq!(
            set_role(&state, &promoted, "3", Role::Manager)
                .await
                .unwrap()
                .role,
            Role::Manager
        );
    }

    #[tokio::test]
    async fn players_link_themselves_once() {
        let (state, store) = seeded_state().await;
        let rookie = register(
            &state,
            RegisterRequest {
                email: "rookie@baseball.com".into(),
                name: "Rookie".into(),
                phone: None,
            },
        )
        .await
        .unwrap();
        let me = state.resolve_caller(&rookie.id).await.unwrap();

        let linked = link_player(
            &state,
            &me,
            &rookie.id,
            LinkPlayerRequest {
                player_id: "6".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(linked.player_id.as_deref(), Some("6"));
        let persisted = store.load().await.unwrap();
        let account = persisted.users.iter().find(|u| u.id == rookie.id).unwrap();
        assert_eq!(account.player_id.as_deref(), Some("6"));

        // Player 1 already backs Mike's account.
        let err = link_player(
            &state,
            &me,
            &rookie.id,
            LinkPlayerRequest {
                player_id: "1".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        let err = link_player(
            &state,
            &me,
            "2",
            LinkPlayerRequest {
                player_id: "7".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn profile_edits_are_persisted() {
        let (state, store) = seeded_state().await;
        let mike = state.resolve_caller("3").await.unwrap();

        let updated = update_profile(
            &state,
            &mike,
            "3",
            UpdateProfileRequest {
                email: Some("trout@baseball.com".into()),
                phone: Some("555-0199".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.email, "trout@baseball.com");
        assert_eq!(get_user(&state, &mike, "3").await.unwrap().phone.as_deref(), Some("555-0199"));
        let persisted = store.load().await.unwrap();
        assert!(persisted.users.iter().any(|u| u.email == "trout@baseball.com"));

        let err = update_profile(
            &state,
            &mike,
            "3",
            UpdateProfileRequest {
                email: Some("aaron@baseball.com".into()),
                phone: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        let err = get_user(&state, &mike, "4").await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
