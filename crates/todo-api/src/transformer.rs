//! ワイヤ用の値変換（superjson 互換のエンベロープ）
//!
//! 日時は ISO 8601 文字列として `json` に入り、`meta.values` にそのパスが
//! `["Date"]` として記録される。クライアントはこれを見て Date に戻す。

use domain::{Session, Todo};
use serde::Serialize;
use serde_json::{json, Map, Value};
use shared::AppError;

/// 値の中で日時になっているフィールドのパスを列挙する
pub trait DatePaths {
    fn collect_date_paths(&self, prefix: &str, out: &mut Vec<String>);
}

fn child(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

impl DatePaths for Todo {
    fn collect_date_paths(&self, prefix: &str, out: &mut Vec<String>) {
        out.push(child(prefix, "createdAt"));
    }
}

/// `expires` はセッション取得 API の形に合わせて素の ISO 文字列のまま返す
impl DatePaths for Session {
    fn collect_date_paths(&self, _prefix: &str, _out: &mut Vec<String>) {}
}

impl<T: DatePaths> DatePaths for Option<T> {
    fn collect_date_paths(&self, prefix: &str, out: &mut Vec<String>) {
        if let Some(inner) = self {
            inner.collect_date_paths(prefix, out);
        }
    }
}

impl<T: DatePaths> DatePaths for Vec<T> {
    fn collect_date_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (index, item) in self.iter().enumerate() {
            item.collect_date_paths(&child(prefix, &index.to_string()), out);
        }
    }
}

/// 値をエンベロープに包む
pub fn serialize<T>(value: &T) -> Result<Value, AppError>
where
    T: Serialize + DatePaths,
{
    let json = serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("serialize output: {e}")))?;

    let mut paths = Vec::new();
    value.collect_date_paths("", &mut paths);

    if paths.is_empty() {
        return Ok(json!({ "json": json }));
    }

    let values: Map<String, Value> = paths
        .into_iter()
        .map(|path| (path, json!(["Date"])))
        .collect();

    Ok(json!({ "json": json, "meta": { "values": values } }))
}

/// 受信した入力からエンベロープを剥がす。素の JSON もそのまま受け付ける。
/// `null` と `json` を欠いたエンベロープ（undefined の表現）は入力なしとして扱う。
pub fn deserialize_input(raw: Value) -> Option<Value> {
    let value = match raw {
        Value::Object(mut map) if is_envelope(&map) => map.remove("json").unwrap_or(Value::Null),
        other => other,
    };

    (!value.is_null()).then_some(value)
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    let has_marker = map.contains_key("json") || map.contains_key("meta");
    has_marker && map.keys().all(|k| k == "json" || k == "meta")
}
