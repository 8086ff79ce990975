use super::quote_ident;

/// Build `INSERT INTO t (c1, c2) VALUES (?, ?)`, optionally with an
/// `ON DUPLICATE KEY UPDATE` tail that rewrites only the named columns from
/// the incoming values; unrelated columns and auto-generated identifiers in
/// the conflicting row stay untouched.
#[must_use]
pub fn build_insert(table: &str, columns: &[String], upsert_columns: Option<&[&str]>) -> String {
    let column_list = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");

    let mut sql = format!(
        "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
        quote_ident(table)
    );
    if let Some(update_columns) = upsert_columns {
        let assignments = update_columns
            .iter()
            .map(|column| {
                let quoted = quote_ident(column);
                format!("{quoted} = VALUES({quoted})")
            })
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        sql.push_str(&assignments);
    }
    sql
}

/// Build `UPDATE t SET c1 = ?, c2 = ? WHERE id_column = ?`.
#[must_use]
pub fn build_update(table: &str, columns: &[&str], id_column: &str) -> String {
    let assignments = columns
        .iter()
        .map(|column| format!("{} = ?", quote_ident(column)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE {} = ?",
        quote_ident(table),
        quote_ident(id_column)
    )
}

#[must_use]
pub fn build_drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}
