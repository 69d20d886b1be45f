use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Identifiers for the employees that do not come with one: the file name and the row number.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Filters the cells that cannot be the name of a person.
pub fn is_plausible_name(name: &str) -> bool {
    let len = name.chars().count();
    len > 2
        && len < 100
        && name.chars().any(|c| c.is_alphabetic())
        && !matches!(name.to_lowercase().as_str(), "none" | "null" | "nan")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids() {
        let f = make_default_id("/tmp/rosters/q3.xlsx");
        assert_eq!(f(2), "q3.xlsx-00000002");
        assert_eq!(f(1234), "q3.xlsx-00001234");
    }

    #[test]
    fn plausible_names() {
        assert!(is_plausible_name("Anna Smith"));
        assert!(is_plausible_name("Bob"));
        assert!(!is_plausible_name("Al"));
        assert!(!is_plausible_name("1234"));
        assert!(!is_plausible_name("NaN"));
        assert!(!is_plausible_name("None"));
        assert!(!is_plausible_name(&"x".repeat(100)));
    }
}
