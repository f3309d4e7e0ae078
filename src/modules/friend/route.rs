use crate::modules::friend::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(list_sent_requests)
            .service(get_request_status)
            .service(are_friends)
            .service(list_pending_requests)
            .service(list_friends),
    );
}
