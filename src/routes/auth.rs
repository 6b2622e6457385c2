use axum::{
    Extension, Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::auth::{
        LinkPlayerRequest, LoginRequest, RegisterRequest, RoleRequest, UpdateProfileRequest,
        UserSummary,
    },
    error::AppError,
    services::auth_service,
    state::{SharedState, identity::Caller},
};

const USER_ID_HEADER: &str = "x-user-id";

/// Account routes: mock login, registration and user administration.
pub fn router(state: SharedState) -> Router<SharedState> {
    let public = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register));

    let protected = Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user).put(update_profile))
        .route("/users/{id}/role", put(set_role))
        .route("/users/{id}/player", put(link_player))
        .route_layer(middleware::from_fn_with_state(state, require_caller));

    public.merge(protected)
}

/// Sign in by email; the returned id identifies the caller on later requests.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Account found", body = UserSummary),
        (status = 401, description = "No account for this email")
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<LoginRequest>>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(auth_service::login(&state, payload).await?))
}

/// Create a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserSummary),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegisterRequest>>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(auth_service::register(&state, payload).await?))
}

/// List every account.
#[utoipa::path(
    get,
    path = "/users",
    tag = "auth",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    responses((status = 200, description = "Registered accounts", body = [UserSummary]))
)]
pub async fn list_users(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    Ok(Json(auth_service::list_users(&state, &caller).await?))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "auth",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Account to fetch")
    ),
    responses(
        (status = 200, description = "Account", body = UserSummary),
        (status = 403, description = "Another account, without user administration rights"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn get_user(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(auth_service::get_user(&state, &caller, &id).await?))
}

/// Edit the email and phone of an account.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "auth",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Account to edit")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserSummary),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<UpdateProfileRequest>>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(
        auth_service::update_profile(&state, &caller, &id, payload).await?,
    ))
}

/// Change the role of an account.
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "auth",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Account to update")
    ),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role changed", body = UserSummary),
        (status = 403, description = "Caller cannot grant this role")
    )
)]
pub async fn set_role(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(
        auth_service::set_role(&state, &caller, &id, payload.role).await?,
    ))
}

/// Link an account to a roster player.
#[utoipa::path(
    put,
    path = "/users/{id}/player",
    tag = "auth",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Account to link")
    ),
    request_body = LinkPlayerRequest,
    responses(
        (status = 200, description = "Account linked", body = UserSummary),
        (status = 409, description = "Player already linked to another account")
    )
)]
pub async fn link_player(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<LinkPlayerRequest>>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(
        auth_service::link_player(&state, &caller, &id, payload).await?,
    ))
}

/// Resolve the `X-User-Id` header into a [`Caller`] extension.
pub(super) async fn require_caller(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Unauthorized("missing caller header `X-User-Id`".into()))?;

    let caller = state
        .resolve_caller(&user_id)
        .await
        .ok_or_else(|| AppError::Unauthorized(format!("unknown account `{user_id}`")))?;

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
