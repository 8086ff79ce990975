use super::quote_ident;

/// Knobs for [`build_select_where`]. `limit` defaults to 100; ordering beyond
/// the optional explicit column is engine-default and not to be relied on.
#[derive(Debug, Clone)]
pub struct SelectOptions {
    pub order_by: Option<String>,
    pub limit: u64,
    pub offset: Option<u64>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            order_by: None,
            limit: 100,
            offset: None,
        }
    }
}

impl SelectOptions {
    #[must_use]
    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Build `SELECT * FROM t WHERE k1 = ? AND k2 = ? ... [ORDER BY c] LIMIT n`.
///
/// An empty filter list degenerates to the always-true predicate `WHERE 1`.
#[must_use]
pub fn build_select_where(table: &str, filter_columns: &[&str], opts: &SelectOptions) -> String {
    let where_clause = if filter_columns.is_empty() {
        "1".to_string()
    } else {
        filter_columns
            .iter()
            .map(|column| format!("{} = ?", quote_ident(column)))
            .collect::<Vec<_>>()
            .join(" AND ")
    };

    let mut sql = format!("SELECT * FROM {} WHERE {}", quote_ident(table), where_clause);
    if let Some(column) = &opts.order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(&quote_ident(column));
    }
    match opts.offset {
        Some(offset) => sql.push_str(&format!(" LIMIT {offset}, {}", opts.limit)),
        None => sql.push_str(&format!(" LIMIT {}", opts.limit)),
    }
    sql
}

#[must_use]
pub fn build_show_columns(table: &str) -> String {
    format!("SHOW COLUMNS FROM {}", quote_ident(table))
}
