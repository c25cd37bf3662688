/// Parsing helpers for the handful of generic header values whose shape
/// the codec itself depends on (resource-specific value grammars live in
/// the resource layer, not here).
pub fn split_comma_separated(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses an `Active-Request-Id-List` value (comma-separated request ids).
pub fn parse_request_id_list(value: &str) -> Vec<u32> {
    split_comma_separated(value)
        .into_iter()
        .filter_map(|s| s.parse().ok())
        .collect()
}

pub fn join_comma_separated<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        assert_eq!(
            split_comma_separated("1, 2 ,3"),
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
    }

    #[test]
    fn parses_request_id_list() {
        assert_eq!(parse_request_id_list("101,102, 103"), vec![101, 102, 103]);
    }

    #[test]
    fn joins_back_to_wire_form() {
        assert_eq!(join_comma_separated(["101", "102"]), "101,102");
    }
}
