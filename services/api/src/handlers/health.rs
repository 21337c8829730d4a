use axum::extract::State;
use deadpool_redis::redis;

use worktunes_core::health::{DependencyCheck, Readiness};

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

pub async fn readyz(State(state): State<AppState>) -> Readiness {
    let postgres = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "postgres not ready");
            false
        }
    };
    let redis = match ping_redis(&state).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "redis not ready");
            false
        }
    };
    Readiness::from_checks(vec![
        DependencyCheck { name: "postgres", ok: postgres },
        DependencyCheck { name: "redis", ok: redis },
    ])
}

async fn ping_redis(state: &AppState) -> anyhow::Result<()> {
    let mut conn = state.redis.get().await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}
