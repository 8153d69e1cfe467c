use serde::{Deserialize, Serialize};

/// An opaque JWT issued by the API.
///
/// The same shape serves both roles of the login flow: the pending login
/// token returned when a code is emailed, and the bearer token it is
/// exchanged for once the code is authorized.
pub type Token = String;

/// Profile information attached to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInformation {
    pub name: String,
    pub email: String,
    pub instagram: Option<String>,
}
