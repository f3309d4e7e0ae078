use crate::modules::conversation::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/conversations")
            .service(create_group_conversation)
            .service(get_or_create_direct_conversation)
            .service(search_conversations)
            .service(add_participant)
            .service(remove_participant)
            .service(accept_invitation)
            .service(decline_invitation)
            .service(get_conversation)
            .service(list_conversations),
    );
}
