use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::identity::Principal;
use crate::errors::AppError;
use crate::state::AppState;

/// A caller holding a valid shopper (`user` role) credential.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedShopper(pub Uuid);

/// A caller holding a valid delivery-staff credential.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCourier(pub Uuid);

fn principal(req: &HttpRequest) -> Result<Principal, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state is not registered".into()))?;
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("No token, authorization denied.".into()))?;
    Ok(state.identity.verify(token)?)
}

fn wrong_role(principal: Principal, route: &str) -> AppError {
    log::warn!(
        "{} {} refused on {route} route",
        principal.role().as_str(),
        principal.subject_id()
    );
    AppError::Forbidden
}

impl FromRequest for AuthenticatedShopper {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(principal(req).and_then(|p| match p {
            Principal::Shopper { shopper_id } => Ok(Self(shopper_id)),
            other => Err(wrong_role(other, "shopper")),
        }))
    }
}

impl FromRequest for AuthenticatedCourier {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(principal(req).and_then(|p| match p {
            Principal::Delivery { courier_id } => Ok(Self(courier_id)),
            other => Err(wrong_role(other, "delivery")),
        }))
    }
}
