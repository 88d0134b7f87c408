use crate::errors::AppError;
use crate::routes::auth_routes::configure_auth_routes;
use crate::routes::game_routes::configure_game_routes;
use crate::routes::leaderboard_routes::configure_leaderboard_routes;
use crate::routes::user_routes::configure_user_routes;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .configure(configure_auth_routes)
            .configure(configure_user_routes)
            .configure(configure_game_routes)
            .configure(configure_leaderboard_routes),
    );
}
