pub mod credential;
pub mod jwt;
