
mod auth_test;
mod bgm_test;
mod environment_test;
mod router_test;
