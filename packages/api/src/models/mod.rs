//! Wire formats of the hosted auth service.

mod token;
mod user;

pub(crate) use token::{ErrorBody, SignUpResponse, TokenResponse};
pub(crate) use user::AuthUser;
