//! Internal messages - Store-and-poll mail between accounts.

use crate::{
    core::policy::Actor,
    entities::{Account, Message, message},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};

/// Sends a message from the acting account to a recipient.
///
/// # Errors
/// Returns a validation error for an empty body and not-found for an
/// unknown recipient.
pub async fn send_message(
    db: &DatabaseConnection,
    actor: &Actor,
    recipient_id: i64,
    subject: String,
    body: String,
) -> Result<message::Model> {
    if body.trim().is_empty() {
        return Err(Error::Validation {
            message: "message body cannot be empty".to_string(),
        });
    }

    Account::find_by_id(recipient_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "account",
            id: recipient_id.to_string(),
        })?;

    message::ActiveModel {
        sender_id: Set(actor.account_id),
        recipient_id: Set(recipient_id),
        subject: Set(subject),
        body: Set(body),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Messages the account sent or received, newest first.
pub async fn messages_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<message::Model>> {
    Message::find()
        .filter(
            Condition::any()
                .add(message::Column::SenderId.eq(account_id))
                .add(message::Column::RecipientId.eq(account_id)),
        )
        .order_by_desc(message::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a message read. Only the recipient may do this.
pub async fn mark_read(
    db: &DatabaseConnection,
    actor: &Actor,
    message_id: i64,
) -> Result<message::Model> {
    let message = Message::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "message",
            id: message_id.to_string(),
        })?;

    if message.recipient_id != actor.account_id {
        return Err(Error::Forbidden {
            operation: "mark_read",
        });
    }

    let mut active: message::ActiveModel = message.into();
    active.is_read = Set(true);
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_send_and_poll() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "alice").await?;
        let bob = create_test_employee(&db, "bob").await?;

        send_message(
            &db,
            &Actor::employee(alice.id),
            bob.id,
            "Lunch?".to_string(),
            "Noon at the usual spot".to_string(),
        )
        .await?;

        let inbox = messages_for_account(&db, bob.id).await?;
        assert_eq!(inbox.len(), 1);
        assert!(!inbox[0].is_read);

        // The sender sees it in their feed too
        assert_eq!(messages_for_account(&db, alice.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "alice").await?;
        let bob = create_test_employee(&db, "bob").await?;

        let result = send_message(
            &db,
            &Actor::employee(alice.id),
            bob.id,
            "Empty".to_string(),
            "   ".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = send_message(
            &db,
            &Actor::employee(alice.id),
            999,
            "Ghost".to_string(),
            "hello".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_only_recipient_marks_read() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "alice").await?;
        let bob = create_test_employee(&db, "bob").await?;

        let message = send_message(
            &db,
            &Actor::employee(alice.id),
            bob.id,
            "Hi".to_string(),
            "body".to_string(),
        )
        .await?;

        // The sender cannot mark their own outgoing message read
        let result = mark_read(&db, &Actor::employee(alice.id), message.id).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        let read = mark_read(&db, &Actor::employee(bob.id), message.id).await?;
        assert!(read.is_read);

        Ok(())
    }
}
