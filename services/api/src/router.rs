use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use worktunes_core::health::healthz;
use worktunes_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{login, logout, me, refresh, register},
    bgm::{delete_bgm, generate_bgm, get_bgm, list_history, submit_feedback},
    environment::{get_current_environment, get_time_of_day, get_weather},
    health::readyz,
    playlist::{
        add_track, create_playlist, delete_playlist, get_playlist, list_playlists, remove_track,
        update_playlist,
    },
    profile::{get_profile, update_profile},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        // BGM
        .route("/api/bgm/generate", post(generate_bgm))
        .route("/api/bgm/history", get(list_history))
        .route("/api/bgm/{id}", get(get_bgm).delete(delete_bgm))
        .route("/api/bgm/{id}/feedback", post(submit_feedback))
        // Environment
        .route("/api/environment/weather", get(get_weather))
        .route("/api/environment/current", get(get_current_environment))
        .route("/api/environment/time-of-day", get(get_time_of_day))
        // Playlists
        .route("/api/playlists", get(list_playlists).post(create_playlist))
        .route(
            "/api/playlists/{id}",
            get(get_playlist)
                .patch(update_playlist)
                .delete(delete_playlist),
        )
        .route("/api/playlists/{id}/tracks", post(add_track))
        .route(
            "/api/playlists/{id}/tracks/{track_id}",
            delete(remove_track),
        )
        // Profile
        .route("/api/users/me/profile", get(get_profile).patch(update_profile))
        // Applied bottom-up: the request id is set before the trace span opens.
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
