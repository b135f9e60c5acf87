//! Handlers for user administration and profile editing.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::user::{UserResponse, user_input_from_form, user_update_from_form};
use crate::api::form::MultipartForm;
use crate::application::services::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/my-users` (admin)
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.user_service.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Creates an account from a multipart form with an optional profile image.
///
/// # Endpoint
///
/// `POST /api/my-users` (admin)
///
/// # Errors
///
/// - 400 for missing fields, short passwords or non-image uploads
/// - 409 if the email is already registered
pub async fn create_user_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let mut form = MultipartForm::collect(multipart, 1).await?;
    // fail on bad fields before anything is written to disk
    user_input_from_form(&form, None)?;

    let image_url = form
        .store_images(state.image_store.as_ref())
        .await?
        .into_iter()
        .next();
    let (input, is_admin) = user_input_from_form(&form, image_url)?;

    let user = state.user_service.create(input, is_admin).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /api/my-users/{id}`: administrators, or the user themself.
pub async fn get_user_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<UserResponse>, AppError> {
    if !actor.is_admin && actor.user_id != id {
        return Err(AppError::forbidden(
            "You can only view your own profile",
            json!({ "id": id }),
        ));
    }
    let user = state.user_service.get(id).await?;
    Ok(Json(user.into()))
}

/// Partially updates a profile from a multipart form.
///
/// # Endpoint
///
/// `PUT /api/my-users/{id}`
///
/// Blank fields are left unchanged. Only administrators may change
/// `is_admin` or edit other accounts.
pub async fn update_user_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<UserResponse>, AppError> {
    let mut form = MultipartForm::collect(multipart, 1).await?;
    user_update_from_form(&form, None)?;
    if !actor.is_admin && actor.user_id != id {
        return Err(AppError::forbidden(
            "You can only edit your own profile",
            json!({ "id": id }),
        ));
    }

    let image_url = form
        .store_images(state.image_store.as_ref())
        .await?
        .into_iter()
        .next();
    let update = user_update_from_form(&form, image_url)?;

    let user = state.user_service.update(&actor, id, update).await?;
    Ok(Json(user.into()))
}

/// `DELETE /api/my-users/{id}` (admin)
pub async fn delete_user_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    if actor.user_id == id {
        return Err(AppError::bad_request(
            "You cannot delete your own account",
            json!({ "id": id }),
        ));
    }
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
