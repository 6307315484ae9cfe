//! Validation of caller-supplied file names and folder paths.
//!
//! Both end up as mirror filesystem paths, so anything that could escape
//! the mirror root is rejected up front.

use crate::error::AppError;
use crate::result::AppResult;

/// Check a single path component.
fn check_component(component: &str, what: &str) -> AppResult<()> {
    if component.is_empty() {
        return Err(AppError::validation(format!("{what} must not be empty")));
    }
    if component == "." || component == ".." {
        return Err(AppError::validation(format!(
            "{what} must not be '{component}'"
        )));
    }
    if component.contains(['/', '\\', '\0']) {
        return Err(AppError::validation(format!(
            "{what} contains an illegal character: {component:?}"
        )));
    }
    Ok(())
}

/// Validate a logical file name: exactly one non-empty path component.
pub fn validate_file_name(file_name: &str) -> AppResult<()> {
    check_component(file_name, "File name")
}

/// Validate a project folder: a relative `/`-separated path whose
/// components are all valid names.
pub fn validate_folder(folder: &str) -> AppResult<()> {
    if folder.is_empty() {
        return Err(AppError::validation("Folder must not be empty"));
    }
    if folder.starts_with('/') {
        return Err(AppError::validation(format!(
            "Folder must be a relative path: {folder}"
        )));
    }
    folder
        .split('/')
        .try_for_each(|part| check_component(part, "Folder segment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert!(validate_file_name("a.txt").is_ok());
        assert!(validate_file_name("Login.jsx").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("dir/a.txt").is_err());
        assert!(validate_file_name("a\\b").is_err());
    }

    #[test]
    fn test_folders() {
        assert!(validate_folder("manager6").is_ok());
        assert!(validate_folder("team/alpha").is_ok());
        assert!(validate_folder("team/alpha/").is_err());
        assert!(validate_folder("").is_err());
        assert!(validate_folder("/etc").is_err());
        assert!(validate_folder("team/../../etc").is_err());
        assert!(validate_folder("team//alpha").is_err());
    }
}
