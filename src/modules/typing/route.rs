use crate::modules::typing::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(set_typing).service(get_typing_users).service(clear_typing);
}
