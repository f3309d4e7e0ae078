use actix_web::web;

use crate::modules::file_upload::handle;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/files")
            .service(web::resource("/").route(web::post().to(handle::upload_file)))
            .service(
                web::resource("/{file_id}")
                    .route(web::get().to(handle::get_file))
                    .route(web::delete().to(handle::delete_file)),
            ),
    );
}
