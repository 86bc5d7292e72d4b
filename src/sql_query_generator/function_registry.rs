use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Cypher aggregate name (lowercased) -> SQL aggregate name.
    static ref AGGREGATE_FUNCTIONS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("count", "count");
        m.insert("sum", "sum");
        m.insert("avg", "avg");
        m.insert("min", "min");
        m.insert("max", "max");
        m.insert("collect", "array_agg");
        m
    };
}

/// SQL name for a Cypher aggregate function, if it is one we support.
pub fn aggregate_sql_name(name: &str) -> Option<&'static str> {
    AGGREGATE_FUNCTIONS.get(name.to_lowercase().as_str()).copied()
}

pub fn is_aggregate(name: &str) -> bool {
    aggregate_sql_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_aggregates() {
        assert_eq!(aggregate_sql_name("COUNT"), Some("count"));
        assert_eq!(aggregate_sql_name("collect"), Some("array_agg"));
        assert_eq!(aggregate_sql_name("Avg"), Some("avg"));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(aggregate_sql_name("shortestPath"), None);
        assert!(!is_aggregate("substring"));
    }
}
