use crate::controllers::auth_controller::{create_guest_session, login, register};
use actix_web::web;

pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/guest", web::get().to(create_guest_session)),
    );
}
