//! Changed-file filtering

/// Filters changed files down to SQL models.
///
/// Keeps paths that live under `models/` and end with `.sql`; everything
/// else in the pull request (docs, yml, macros) is irrelevant to table
/// comparisons.
pub fn relevant_files(files: &[String]) -> Vec<String> {
    files
        .iter()
        .filter(|file| file.starts_with("models/") && file.ends_with(".sql"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_sql_files_under_models() {
        let files = vec![
            "models/sales/orders.sql".to_string(),
            "models/schema.yml".to_string(),
            "macros/helpers.sql".to_string(),
            "README.md".to_string(),
            "models/customers.sql".to_string(),
        ];

        assert_eq!(
            relevant_files(&files),
            vec![
                "models/sales/orders.sql".to_string(),
                "models/customers.sql".to_string(),
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(relevant_files(&[]).is_empty());
    }
}
