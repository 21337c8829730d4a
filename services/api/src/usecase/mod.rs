pub mod auth;
pub mod bgm;
pub mod environment;
pub mod playlist;
pub mod profile;
