pub mod auth;
pub mod bgm;
pub mod environment;
pub mod health;
pub mod playlist;
pub mod profile;
