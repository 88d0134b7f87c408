use crate::controllers::game_controller::{get_game_records, save_game_record};
use actix_web::web;

pub fn configure_game_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/game/record", web::post().to(save_game_record))
        .route("/game/records", web::get().to(get_game_records));
}
