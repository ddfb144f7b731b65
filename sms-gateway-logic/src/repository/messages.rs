use crate::{
    error::ServiceError,
    metrics,
    types::{Message, MessageId, MessageStatus, NewMessage, UserId},
};
use entity::{
    messages::{ActiveModel, Column, Entity, Model},
    sea_orm_active_enums,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Statement,
};

const MESSAGE_COLUMNS: &str =
    "id, user_id, content, receiver, cost, status::text AS status, created_at, updated_at";

pub async fn create_scheduled(
    db: &DatabaseConnection,
    user_id: UserId,
    new_messages: &[NewMessage],
) -> Result<(), ServiceError> {
    if new_messages.is_empty() {
        return Ok(());
    }
    let models = new_messages.iter().map(|message| ActiveModel {
        user_id: Set(user_id),
        content: Set(message.content.clone()),
        receiver: Set(message.receiver.clone()),
        cost: Set(message.cost),
        status: Set(sea_orm_active_enums::MessageStatus::Scheduled),
        ..Default::default()
    });
    Entity::insert_many(models).exec(db).await?;

    metrics::MESSAGE_STATUS_TOTAL
        .with_label_values(&[MessageStatus::Scheduled.as_str()])
        .inc_by(new_messages.len() as u64);
    Ok(())
}

pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: UserId,
    skip: u64,
    limit: u64,
    descending: bool,
) -> Result<Vec<Message>, ServiceError> {
    let query = Entity::find().filter(Column::UserId.eq(user_id));
    let query = if descending {
        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    } else {
        query
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
    };
    let models = query.offset(skip).limit(limit).all(db).await?;
    Ok(models.into_iter().map(Into::into).collect())
}

/// Claims up to `count` of the oldest SCHEDULED rows in one statement.
/// `SKIP LOCKED` lets interleaved claimers pass each other without ever
/// returning the same row to two callers.
pub async fn claim_earliest(
    db: &DatabaseConnection,
    count: u64,
) -> Result<Vec<Message>, ServiceError> {
    let statement = Statement::from_sql_and_values(
        db.get_database_backend(),
        format!(
            r#"
            UPDATE messages
            SET status = 'enqueued', updated_at = (now() AT TIME ZONE 'utc')
            WHERE id IN (
                SELECT id FROM messages
                WHERE status = 'scheduled'
                ORDER BY created_at ASC, id ASC
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {MESSAGE_COLUMNS};"#
        ),
        [(count as i64).into()],
    );
    let models = Model::find_by_statement(statement).all(db).await?;

    // RETURNING carries no order guarantee.
    let mut claimed: Vec<Message> = models.into_iter().map(Into::into).collect();
    claimed.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

    metrics::MESSAGE_STATUS_TOTAL
        .with_label_values(&[MessageStatus::Enqueued.as_str()])
        .inc_by(claimed.len() as u64);
    Ok(claimed)
}

pub async fn mark_sent(db: &DatabaseConnection, id: MessageId) -> Result<Message, ServiceError> {
    finalize(db, id, MessageStatus::Sent).await
}

pub async fn mark_failed(db: &DatabaseConnection, id: MessageId) -> Result<Message, ServiceError> {
    finalize(db, id, MessageStatus::Failed).await
}

/// Conditional on the row still being ENQUEUED, so a stale duplicate can
/// never finalize a message twice.
async fn finalize(
    db: &DatabaseConnection,
    id: MessageId,
    status: MessageStatus,
) -> Result<Message, ServiceError> {
    let statement = Statement::from_sql_and_values(
        db.get_database_backend(),
        format!(
            r#"
            UPDATE messages
            SET status = $2::message_status, updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1 AND status = 'enqueued'
            RETURNING {MESSAGE_COLUMNS};"#
        ),
        [id.into(), status.as_str().into()],
    );
    let model = Model::find_by_statement(statement)
        .one(db)
        .await?
        .ok_or(ServiceError::MessageNotFound)?;

    metrics::MESSAGE_STATUS_TOTAL
        .with_label_values(&[status.as_str()])
        .inc();
    Ok(model.into())
}

/// Compensating action for a failed runtime-queue push after a successful
/// claim; flips the rows back regardless of their current state.
pub async fn reschedule(db: &DatabaseConnection, ids: &[MessageId]) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Ok(());
    }
    let statement = Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"
            UPDATE messages
            SET status = 'scheduled', updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = ANY($1);"#,
        [ids.to_vec().into()],
    );
    db.execute(statement).await?;
    Ok(())
}
