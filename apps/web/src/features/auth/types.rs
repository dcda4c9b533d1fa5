//! Request bodies for the auth REST API. Several carry passwords or refresh
//! tokens, so they must never be logged.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
pub struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Serialize)]
pub struct SignupBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: &'a Map<String, Value>,
}

#[derive(Serialize)]
pub struct RecoverBody<'a> {
    pub email: &'a str,
}
