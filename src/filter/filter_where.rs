use super::filter::LeadFilter;
use super::types::{Constraint, FilterValue, SqlParam, SqlResult};

/// Columns searched by the free-text term
const TEXT_SEARCH_COLUMNS: [&str; 5] = ["first_name", "last_name", "email", "company", "city"];

/// Renders a [`LeadFilter`] into a PostgreSQL WHERE clause with `$n` params
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(filter: &LeadFilter, starting_param_index: usize) -> SqlResult {
        let mut filter_where = Self::new(starting_param_index);
        let query = filter_where.build(filter);
        SqlResult { query, params: filter_where.param_values }
    }

    fn build(&mut self, filter: &LeadFilter) -> String {
        let mut sql_conditions = vec![];

        if let Some(text) = &filter.text {
            let placeholder = self.param(SqlParam::Text(like_pattern(text)));
            let ors: Vec<String> = TEXT_SEARCH_COLUMNS
                .iter()
                .map(|column| format!("\"{}\" ILIKE {}", column, placeholder))
                .collect();
            sql_conditions.push(format!("({})", ors.join(" OR ")));
        }

        self.push_all(&mut sql_conditions, "email", &filter.email);
        self.push_all(&mut sql_conditions, "company", &filter.company);
        self.push_all(&mut sql_conditions, "city", &filter.city);
        self.push_all(&mut sql_conditions, "status", &filter.status);
        self.push_all(&mut sql_conditions, "source", &filter.source);
        self.push_all(&mut sql_conditions, "score", &filter.score);
        self.push_all(&mut sql_conditions, "lead_value", &filter.lead_value);
        self.push_all(&mut sql_conditions, "created_at", &filter.created_at);
        self.push_all(&mut sql_conditions, "last_activity_at", &filter.last_activity_at);

        if let Some(flag) = filter.is_qualified {
            let placeholder = self.param(SqlParam::Bool(flag));
            sql_conditions.push(format!("\"is_qualified\" = {}", placeholder));
        }

        if sql_conditions.is_empty() { "TRUE".to_string() } else { sql_conditions.join(" AND ") }
    }

    fn push_all<T: FilterValue>(&mut self, out: &mut Vec<String>, column: &str, constraints: &[Constraint<T>]) {
        for constraint in constraints {
            out.push(self.build_sql_condition(column, constraint));
        }
    }

    fn build_sql_condition<T: FilterValue>(&mut self, column: &str, constraint: &Constraint<T>) -> String {
        let quoted_column = format!("\"{}\"", column);
        match constraint {
            Constraint::Equals(v) => format!("{} = {}", quoted_column, self.param(v.to_param())),
            Constraint::Contains(needle) => {
                format!("{} ILIKE {}", quoted_column, self.param(SqlParam::Text(like_pattern(needle))))
            }
            Constraint::InSet(values) => {
                if values.is_empty() { return "FALSE".to_string(); }
                let params: Vec<String> = values.iter().map(|v| self.param(v.to_param())).collect();
                format!("{} IN ({})", quoted_column, params.join(", "))
            }
            Constraint::Range { min, max } => format!(
                "{} BETWEEN {} AND {}",
                quoted_column,
                self.param(min.to_param()),
                self.param(max.to_param())
            ),
            Constraint::GreaterThan(v) => format!("{} > {}", quoted_column, self.param(v.to_param())),
            Constraint::LessThan(v) => format!("{} < {}", quoted_column, self.param(v.to_param())),
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// `%needle%` with LIKE metacharacters escaped (backslash is the default escape)
fn like_pattern(needle: &str) -> String {
    let escaped = needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}
