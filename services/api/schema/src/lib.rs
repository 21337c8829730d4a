pub mod generated_bgms;
pub mod playlist_tracks;
pub mod playlists;
pub mod user_activities;
pub mod user_profiles;
pub mod users;
