use crate::modules::message::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/messages")
            .service(send_message)
            .service(toggle_reaction)
            .service(edit_message)
            .service(delete_message),
    )
    // conversation-scoped reads
    .service(get_messages_paginated)
    .service(search_messages)
    .service(get_messages);
}
