pub mod auth;
pub mod docs;
pub mod system;
