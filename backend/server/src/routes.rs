use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    config::Config,
    error::AppError,
    firebase::FirebaseAdmin,
    storage::default_profile_picture,
    units::{Unit, UnitStore, get_unit, min_withdrawal},
};

pub const AUTH_TOKEN_COOKIE: &str = "authToken";
pub const ROLE_COOKIE: &str = "role";

/// `Set-Cookie` value that makes the browser drop `name` right away.
pub fn expired_cookie(name: &str, http_only: bool, secure: bool) -> String {
    let expires = DateTime::<Utc>::UNIX_EPOCH.format("%a, %d %b %Y %H:%M:%S GMT");
    let mut cookie = format!("{name}=; Path=/; Max-Age=0; Expires={expires}");

    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str("; SameSite=Strict");

    cookie
}

pub async fn logout_handler(State(config): State<Arc<Config>>) -> impl IntoResponse {
    let secure = config.is_production();

    (
        StatusCode::OK,
        // role stays readable from js, the UI uses it for navigation
        AppendHeaders([
            (SET_COOKIE, expired_cookie(AUTH_TOKEN_COOKIE, true, secure)),
            (SET_COOKIE, expired_cookie(ROLE_COOKIE, false, secure)),
        ]),
        Json(json!({ "message": "Logout successful" })),
    )
}

pub async fn unit_handler<S>(
    State(store): State<Arc<S>>,
    Path(unit_id): Path<String>,
) -> Result<Json<Unit>, AppError>
where
    S: UnitStore + Send + Sync + 'static,
{
    get_unit(store.as_ref(), &unit_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("unit {unit_id}")))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinWithdrawal {
    pub unit_id: String,
    pub min_withdrawal: f64,
}

pub async fn min_withdrawal_handler<S>(
    State(store): State<Arc<S>>,
    Path(unit_id): Path<String>,
) -> Json<MinWithdrawal>
where
    S: UnitStore + Send + Sync + 'static,
{
    let min_withdrawal = min_withdrawal(store.as_ref(), &unit_id).await;
    info!("Unit {unit_id} minimum withdrawal: {min_withdrawal}");

    Json(MinWithdrawal {
        unit_id,
        min_withdrawal,
    })
}

#[derive(Serialize)]
pub struct ProfilePicture {
    pub url: Option<String>,
}

pub async fn profile_picture_handler(
    State(firebase): State<Arc<FirebaseAdmin>>,
) -> Json<ProfilePicture> {
    Json(ProfilePicture {
        url: default_profile_picture(firebase.as_ref()).await,
    })
}
