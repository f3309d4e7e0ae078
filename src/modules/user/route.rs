use crate::modules::user::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/auth").service(sync_user));
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .service(get_profile)
            .service(get_user_by_external_id)
            .service(list_online_users)
            .service(search_users)
            .service(set_online)
            .service(toggle_friend_requests_enabled)
            .service(get_user)
            .service(list_users),
    );
}
