//! Splitting file names into name and extension.

/// Split a file name at its last `.`.
///
/// `"a.txt"` gives `("a", "txt")`, `"archive.tar.gz"` gives
/// `("archive.tar", "gz")` and `"README"` gives `("README", "")`.
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rsplit_once('.') {
        Some((name, extension)) => (name, extension),
        None => (file_name, ""),
    }
}

/// Inverse of [`split_file_name`].
pub fn join_file_name(name: &str, extension: &str) -> String {
    if extension.is_empty() {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}
