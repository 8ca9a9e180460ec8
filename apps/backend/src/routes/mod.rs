pub mod adventure;
pub mod auth;
pub mod cards;
pub mod hero;
pub mod shop;
pub mod users;
