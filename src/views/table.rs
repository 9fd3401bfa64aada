use serde_json::Value;

/// Fields never shown in listings.
const HIDDEN_COLUMNS: &[&str] = &["password", "password_hash"];

pub struct TableRow {
    pub id: String,
    /// `id` escaped for use in a URL path.
    pub path_id: String,
    pub cells: Vec<String>,
}

pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Text for one JSON value as shown in a cell or form input.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::Null => None,
        id => Some(display_value(id)),
    }
}

/// Lay out backend records as a table. Columns are the union of the
/// records' keys with `id` first.
pub fn build(records: &[Value]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        let Some(obj) = record.as_object() else {
            continue;
        };
        for key in obj.keys() {
            if !HIDDEN_COLUMNS.contains(&key.as_str()) && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    if let Some(pos) = columns.iter().position(|c| c == "id") {
        let id = columns.remove(pos);
        columns.insert(0, id);
    }

    let rows = records
        .iter()
        .map(|record| {
            let id = record_id(record).unwrap_or_default();
            TableRow {
                path_id: urlencoding::encode(&id).into_owned(),
                id,
                cells: columns
                    .iter()
                    .map(|col| match record.get(col) {
                        None | Some(Value::Null) => "-".to_string(),
                        Some(v) => display_value(v),
                    })
                    .collect(),
            }
        })
        .collect();

    Table { columns, rows }
}
