pub mod auth;
pub mod booking;
pub mod notification;
pub mod tour;
pub mod user;
