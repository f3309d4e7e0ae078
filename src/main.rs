use actix::Actor;
use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{from_fn, Logger},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{connect_database, RedisCache},
    middlewares::authentication,
    modules::{
        conversation::{
            repository_pg::{ConversationPgRepository, MemberPgRepository},
            service::ConversationService,
        },
        file_upload::{model::UploadConfig, repository_pg::StoredFilePgRepository, service::UploadService},
        friend::{repository_pg::FriendRequestRepositoryPg, service::FriendService},
        message::{
            repository_pg::{MessageRepositoryPg, ReactionRepositoryPg},
            service::MessageService,
        },
        notification::{repository_pg::NotificationRepositoryPg, service::NotificationService},
        realtime::{handler::websocket_handler, server::RealtimeServer},
        typing::{repository_pg::TypingRepositoryPg, service::TypingService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Migration error: {e}")))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let realtime_server = RealtimeServer::new().start();
    let realtime = Arc::new(realtime_server.clone());

    let user_repo = UserRepositoryPg::new(db_pool.clone());
    let friend_repo = Arc::new(FriendRequestRepositoryPg::new(db_pool.clone()));
    let conversation_repo = Arc::new(ConversationPgRepository::new(db_pool.clone()));
    let member_repo = Arc::new(MemberPgRepository::default());
    let message_repo = Arc::new(MessageRepositoryPg::new(db_pool.clone()));
    let reaction_repo = Arc::new(ReactionRepositoryPg::new(db_pool.clone()));
    let notification_repo = Arc::new(NotificationRepositoryPg::new(db_pool.clone()));
    let typing_repo = Arc::new(TypingRepositoryPg::new(db_pool.clone()));
    let file_repo = Arc::new(StoredFilePgRepository::new(db_pool.clone()));

    let user_service =
        UserService::with_dependencies(Arc::new(user_repo.clone()), Arc::new(redis_pool));
    let friend_service = FriendService::with_dependencies(
        friend_repo.clone(),
        notification_repo.clone(),
        Arc::new(user_repo.clone()),
        realtime.clone(),
    );
    let conversation_service = ConversationService::with_dependencies(
        conversation_repo.clone(),
        member_repo.clone(),
        notification_repo.clone(),
        realtime.clone(),
    );
    let message_service = MessageService::with_dependencies(
        message_repo,
        reaction_repo,
        conversation_repo,
        member_repo,
        notification_repo.clone(),
        friend_repo,
        Arc::new(user_repo),
        realtime.clone(),
    );
    let typing_service = TypingService::with_dependencies(typing_repo, realtime.clone());
    let notification_service = NotificationService::with_dependencies(notification_repo);
    let upload_service = UploadService::with_dependencies(file_repo, UploadConfig::from_env());

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(conversation_service.clone()))
            .app_data(web::Data::new(message_service.clone()))
            .app_data(web::Data::new(typing_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(realtime_server.clone()))
            .service(health_check)
            .route("/ws", web::get().to(websocket_handler))
            .service(
                web::scope("/api").configure(modules::user::route::public_api_configure).service(
                    web::scope("")
                        .wrap(from_fn(authentication))
                        .configure(modules::user::route::configure)
                        .configure(modules::friend::route::configure)
                        .configure(modules::conversation::route::configure)
                        .configure(modules::message::route::configure)
                        .configure(modules::typing::route::configure)
                        .configure(modules::notification::route::configure)
                        .configure(modules::file_upload::route::configure),
                ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
