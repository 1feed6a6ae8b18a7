pub mod auth;
pub mod booking;
pub mod cancellation;
pub mod health;
pub mod notification;
pub mod payment;
pub mod tour;
