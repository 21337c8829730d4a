pub mod cache;
pub mod db;
pub mod music;
pub mod weather;
