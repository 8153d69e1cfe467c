//! User domain model.

pub mod model;

pub use model::{Token, UserInformation};
