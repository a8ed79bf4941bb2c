use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{Todo, TodoId, TodoStatus, UserId};
use std::collections::HashMap;

pub const TODO_SK_PREFIX: &str = "TODO#";

/// DynamoDB Single Table Design のキー構造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbKeys {
    pub pk: String, // パーティションキー
    pub sk: String, // ソートキー
}

impl DynamoDbKeys {
    /// ToDo 用のキーを生成（所有ユーザー単位でパーティション）
    pub fn for_todo(user_id: &UserId, todo_id: &TodoId) -> Self {
        Self {
            pk: format!("USER#{}", user_id.as_str()),
            sk: format!("{TODO_SK_PREFIX}{}", todo_id.as_str()),
        }
    }
}

/// Todo を DynamoDB アイテムに変換
pub fn todo_to_item(todo: &Todo) -> HashMap<String, AttributeValue> {
    let keys = DynamoDbKeys::for_todo(&todo.user_id, &todo.id);
    HashMap::from([
        ("PK".to_string(), AttributeValue::S(keys.pk)),
        ("SK".to_string(), AttributeValue::S(keys.sk)),
        ("id".to_string(), AttributeValue::S(todo.id.as_str().to_string())),
        ("content".to_string(), AttributeValue::S(todo.content.clone())),
        ("status".to_string(), AttributeValue::S(todo.status.as_str().to_string())),
        ("createdAt".to_string(), AttributeValue::S(todo.created_at.to_rfc3339())),
        ("userId".to_string(), AttributeValue::S(todo.user_id.as_str().to_string())),
    ])
}

/// DynamoDB アイテムから Todo を復元（欠損・不正な属性があれば None）
pub fn item_to_todo(item: &HashMap<String, AttributeValue>) -> Option<Todo> {
    Some(Todo {
        id: TodoId::parse(attr_s(item, "id")?).ok()?,
        content: attr_s(item, "content")?.clone(),
        status: attr_s(item, "status")?.parse::<TodoStatus>().ok()?,
        created_at: DateTime::parse_from_rfc3339(attr_s(item, "createdAt")?)
            .ok()?
            .with_timezone(&Utc),
        user_id: UserId::parse(attr_s(item, "userId")?.clone()).ok()?,
    })
}

fn attr_s<'a>(item: &'a HashMap<String, AttributeValue>, key: &str) -> Option<&'a String> {
    item.get(key)?.as_s().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{NewTodo, TodoContent};

    fn sample() -> Todo {
        NewTodo::stamped(
            TodoContent::parse("buy milk").unwrap(),
            &UserId::parse("u1").unwrap(),
            Utc::now(),
        )
        .into_todo(TodoId::new())
    }

    #[test]
    fn keys_partition_by_owner() {
        let todo = sample();
        let keys = DynamoDbKeys::for_todo(&todo.user_id, &todo.id);
        assert_eq!(keys.pk, "USER#u1");
        assert_eq!(keys.sk, format!("TODO#{}", todo.id));
    }

    #[test]
    fn item_mapping_preserves_fields() {
        let todo = sample();
        let item = todo_to_item(&todo);

        assert_eq!(item["status"].as_s().unwrap(), "incomplete");
        assert_eq!(item_to_todo(&item), Some(todo));
    }

    #[test]
    fn item_with_missing_attribute_is_skipped() {
        let mut item = todo_to_item(&sample());
        item.remove("userId");
        assert_eq!(item_to_todo(&item), None);
    }

    #[test]
    fn item_with_bad_timestamp_is_skipped() {
        let mut item = todo_to_item(&sample());
        item.insert("createdAt".into(), AttributeValue::S("yesterday".into()));
        assert_eq!(item_to_todo(&item), None);
    }
}
