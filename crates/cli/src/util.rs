use typed_path::Utf8NativePathBuf;

// For argp::FromArgs
pub fn native_path(value: &str) -> Result<Utf8NativePathBuf, String> {
    Ok(Utf8NativePathBuf::from(value))
}

/// The first explicitly given value, else the first non-empty environment variable.
pub fn arg_or_env(value: Option<String>, names: &[&str]) -> Option<String> {
    value.or_else(|| {
        names.iter().find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    })
}

#[cfg(test)]
mod tests {
    use super::arg_or_env;

    #[test]
    fn test_arg_wins_over_env() {
        assert_eq!(
            arg_or_env(Some("explicit".to_string()), &["PATH"]),
            Some("explicit".to_string())
        );
    }

    #[test]
    fn test_env_fallback() {
        assert_eq!(arg_or_env(None, &["REQUIRED_APPROVALS_TEST_UNSET_VARIABLE"]), None);
        assert!(arg_or_env(None, &["REQUIRED_APPROVALS_TEST_UNSET_VARIABLE", "PATH"]).is_some());
    }
}
