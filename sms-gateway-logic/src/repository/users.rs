use crate::{
    error::ServiceError,
    types::{User, UserId},
};
use entity::users::{ActiveModel, Entity};
use sea_orm::{ActiveValue::Set, ConnectionTrait, DatabaseConnection, EntityTrait, Statement};

pub async fn create(db: &DatabaseConnection, name: &str) -> Result<User, ServiceError> {
    let user = ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    };
    let model = Entity::insert(user).exec_with_returning(db).await?;
    Ok(model.into())
}

pub async fn get(db: &DatabaseConnection, id: UserId) -> Result<User, ServiceError> {
    let user = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::UserNotFound)?;
    Ok(user.into())
}

/// Applies `balance := balance + delta` in one statement; the
/// `user_insufficient_balance` constraint rejects a negative result.
pub async fn update_balance(
    db: &DatabaseConnection,
    id: UserId,
    delta: i64,
) -> Result<i64, ServiceError> {
    let statement = Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"
            UPDATE users
            SET balance = balance + $2, updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING balance;"#,
        [id.into(), delta.into()],
    );
    let row = db
        .query_one(statement)
        .await?
        .ok_or(ServiceError::UserNotFound)?;
    let balance = row.try_get_by::<i64, _>("balance")?;
    Ok(balance)
}
