use regex::Regex;

use crate::error::{BiopsError, Result};
use crate::query::{Query, UpdateRequest};

/// Applies the requested edits to a copy of `original` and returns it.
/// Pure: no I/O, and the original is left untouched so the caller can diff
/// the pair and synthesize a recovery command afterwards.
///
/// Replace pairs run in order as global regex substitutions, so a later
/// pair sees the output of earlier ones. The find string is a live regular
/// expression, not an escaped literal.
pub fn apply_edits(original: &Query, request: &UpdateRequest) -> Result<Query> {
    if request.query.is_some() && request.query_replace.is_some() {
        return Err(BiopsError::ConflictingEdit);
    }

    let mut modified = original.clone();

    if let Some(ds) = &request.data_source {
        modified.data_source = ds.clone();
    }

    if let Some(pairs) = &request.query_replace {
        validate_replace_pairs(pairs)?;
        for pair in pairs.chunks(2) {
            let find = Regex::new(&pair[0])?;
            modified.sql = find.replace_all(&modified.sql, pair[1].as_str()).into_owned();
        }
    }

    if let Some(sql) = &request.query {
        modified.sql = sql.clone();
    }

    Ok(modified)
}

fn validate_replace_pairs(pairs: &[String]) -> Result<()> {
    if pairs.len() % 2 != 0 {
        return Err(BiopsError::InvalidEditArguments(
            "query-replace requires an even number of arguments".into(),
        ));
    }
    if pairs.iter().any(|p| p.is_empty()) {
        return Err(BiopsError::InvalidEditArguments(
            "query-replace arguments cannot be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_query() -> Query {
        Query {
            id: "1".into(),
            name: "query1".into(),
            sql: "SELECT * from hoge;".into(),
            data_source: "1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_literal_and_replace_conflict() {
        let request = UpdateRequest {
            query: Some("SELECT 1".into()),
            query_replace: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        };
        let err = apply_edits(&sample_query(), &request).unwrap_err();
        assert!(matches!(err, BiopsError::ConflictingEdit));
    }

    #[test]
    fn test_odd_replace_arity_rejected() {
        let request = UpdateRequest {
            query_replace: Some(vec!["hoge".into(), "fuga".into(), "piyo".into()]),
            ..Default::default()
        };
        let err = apply_edits(&sample_query(), &request).unwrap_err();
        assert!(matches!(err, BiopsError::InvalidEditArguments(_)));
    }

    #[test]
    fn test_empty_replace_member_rejected() {
        let request = UpdateRequest {
            query_replace: Some(vec!["hoge".into(), "".into()]),
            ..Default::default()
        };
        let err = apply_edits(&sample_query(), &request).unwrap_err();
        assert!(matches!(err, BiopsError::InvalidEditArguments(_)));
    }

    #[test]
    fn test_replace_pair_rewrites_sql() {
        let request = UpdateRequest {
            query_replace: Some(vec!["hoge".into(), "fuga".into()]),
            ..Default::default()
        };
        let modified = apply_edits(&sample_query(), &request).unwrap();
        assert_eq!(modified.sql, "SELECT * from fuga;");
    }

    #[test]
    fn test_replace_is_global() {
        let mut original = sample_query();
        original.sql = "SELECT hoge FROM hoge;".into();
        let request = UpdateRequest {
            query_replace: Some(vec!["hoge".into(), "fuga".into()]),
            ..Default::default()
        };
        let modified = apply_edits(&original, &request).unwrap();
        assert_eq!(modified.sql, "SELECT fuga FROM fuga;");
    }

    #[test]
    fn test_replace_pairs_run_in_order() {
        let request = UpdateRequest {
            query_replace: Some(vec![
                "hoge".into(),
                "fuga".into(),
                "fuga".into(),
                "piyo".into(),
            ]),
            ..Default::default()
        };
        let modified = apply_edits(&sample_query(), &request).unwrap();
        assert_eq!(modified.sql, "SELECT * from piyo;");
    }

    #[test]
    fn test_find_string_is_live_regex() {
        let mut original = sample_query();
        original.sql = "SELECT a1, a2 FROM t;".into();
        let request = UpdateRequest {
            query_replace: Some(vec![r"a\d".into(), "b".into()]),
            ..Default::default()
        };
        let modified = apply_edits(&original, &request).unwrap();
        assert_eq!(modified.sql, "SELECT b, b FROM t;");
    }

    #[test]
    fn test_invalid_find_regex_is_an_error() {
        let request = UpdateRequest {
            query_replace: Some(vec!["(".into(), "x".into()]),
            ..Default::default()
        };
        let err = apply_edits(&sample_query(), &request).unwrap_err();
        assert!(matches!(err, BiopsError::Regex(_)));
    }

    #[test]
    fn test_literal_query_overwrites_sql() {
        let request = UpdateRequest {
            query: Some("SELECT 42;".into()),
            ..Default::default()
        };
        let modified = apply_edits(&sample_query(), &request).unwrap();
        assert_eq!(modified.sql, "SELECT 42;");
    }

    #[test]
    fn test_data_source_reassignment() {
        let request = UpdateRequest {
            data_source: Some("10".into()),
            ..Default::default()
        };
        let original = sample_query();
        let modified = apply_edits(&original, &request).unwrap();
        assert_eq!(modified.data_source, "10");
        assert_eq!(modified.sql, original.sql);
    }

    #[test]
    fn test_original_is_untouched() {
        let original = sample_query();
        let request = UpdateRequest {
            query: Some("SELECT 1;".into()),
            data_source: Some("10".into()),
            ..Default::default()
        };
        let _ = apply_edits(&original, &request).unwrap();
        assert_eq!(original.sql, "SELECT * from hoge;");
        assert_eq!(original.data_source, "1");
    }
}
