use sqlx::Postgres;

use crate::{
    error::Result,
    models::notifications::{NewNotification, Notification},
};

use crate::DbConn;

pub async fn create_notification(conn: &mut DbConn, new_notification: NewNotification) -> Result<Notification> {
    let notification = sqlx::query_as::<Postgres, Notification>(
        r#"
        INSERT INTO notifications (
            user_id, title, message, notification_type, related_entity_type, related_entity_id
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, title, message, notification_type, is_read,
                  related_entity_type, related_entity_id, created_at
        "#,
    )
    .bind(new_notification.user_id)
    .bind(&new_notification.title)
    .bind(&new_notification.message)
    .bind(new_notification.notification_type.as_ref())
    .bind(new_notification.related_entity_type.as_ref())
    .bind(new_notification.related_entity_id)
    .fetch_one(conn)
    .await?;

    Ok(notification)
}

/// A user's notifications, newest first.
pub async fn get_notifications_by_user(conn: &mut DbConn, user_id: i64, limit: i64) -> Result<Vec<Notification>> {
    let notifications = sqlx::query_as::<Postgres, Notification>(
        r#"
        SELECT id, user_id, title, message, notification_type, is_read,
               related_entity_type, related_entity_id, created_at
        FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(notifications)
}

/// Marks one of `user_id`'s notifications read. `None` if no such notification
/// belongs to the user.
pub async fn mark_notification_read(conn: &mut DbConn, id: i64, user_id: i64) -> Result<Option<Notification>> {
    let notification = sqlx::query_as::<Postgres, Notification>(
        r#"
        UPDATE notifications
        SET is_read = TRUE
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, title, message, notification_type, is_read,
                  related_entity_type, related_entity_id, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;

    Ok(notification)
}
