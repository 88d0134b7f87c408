use crate::controllers::user_controller::get_current_user;
use actix_web::web;

pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/user", web::get().to(get_current_user));
}
