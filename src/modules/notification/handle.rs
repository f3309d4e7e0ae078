use actix_web::{delete, get, post, web, HttpRequest};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::notification::{
        model::{NotificationResponse, UnreadCountResponse},
        repository_pg::NotificationRepositoryPg,
        service::NotificationService,
    },
};

pub type NotificationSvc = NotificationService<NotificationRepositoryPg>;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[get("/")]
pub async fn list_notifications(
    notification_service: web::Data<NotificationSvc>,
    query: web::Query<ListQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<NotificationResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let notifications = notification_service.get_recent(user_id, query.limit).await?;
    Ok(success::Success::ok(Some(notifications)).message("Notifications retrieved successfully"))
}

#[get("/unread")]
pub async fn list_unread_notifications(
    notification_service: web::Data<NotificationSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<NotificationResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let notifications = notification_service.get_unread(user_id).await?;
    Ok(success::Success::ok(Some(notifications))
        .message("Unread notifications retrieved successfully"))
}

#[get("/unread/count")]
pub async fn unread_count(
    notification_service: web::Data<NotificationSvc>,
    req: HttpRequest,
) -> Result<success::Success<UnreadCountResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let count = notification_service.unread_count(user_id).await?;
    Ok(success::Success::ok(Some(UnreadCountResponse { count })))
}

#[post("/{notification_id}/read")]
pub async fn mark_notification_read(
    notification_service: web::Data<NotificationSvc>,
    notification_id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    notification_service.mark_read(*notification_id).await?;
    Ok(success::Success::ok(None).message("Notification marked as read"))
}

#[post("/read-all")]
pub async fn mark_all_notifications_read(
    notification_service: web::Data<NotificationSvc>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    notification_service.mark_all_read(user_id).await?;
    Ok(success::Success::ok(None).message("All notifications marked as read"))
}

#[delete("/{notification_id}")]
pub async fn delete_notification(
    notification_service: web::Data<NotificationSvc>,
    notification_id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    notification_service.delete(*notification_id).await?;
    Ok(success::Success::no_content())
}
