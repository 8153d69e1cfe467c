pub mod login;
pub mod menu;
pub mod scan;
