/// Expand environment variables in a configured path.
///
/// Recognises `%VAR%`, `${VAR}` and `$VAR`. Unknown variables and unterminated
/// references are kept verbatim so a typo shows up in the directory name the
/// agent reports instead of silently collapsing to an empty segment.
pub fn expand_env_vars(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(pos) = rest.find(|c: char| c == '%' || c == '$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let (name, consumed) = if let Some(after) = tail.strip_prefix('%') {
            match after.find('%') {
                Some(end) if end > 0 => (&after[..end], end + 2),
                _ => ("", 1),
            }
        } else if let Some(after) = tail.strip_prefix("${") {
            match after.find('}') {
                Some(end) if end > 0 => (&after[..end], end + 3),
                _ => ("", 1),
            }
        } else {
            let after = &tail[1..];
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end + 1)
        };

        match std::env::var(name) {
            Ok(value) if !name.is_empty() => out.push_str(&value),
            _ => out.push_str(&tail[..consumed]),
        }
        rest = &tail[consumed..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_expand_percent_style() {
        env::set_var("LOGSHIP_TEST_PCT", "C:\\Logs");
        assert_eq!(expand_env_vars("%LOGSHIP_TEST_PCT%\\portal"), "C:\\Logs\\portal");
        env::remove_var("LOGSHIP_TEST_PCT");
    }

    #[test]
    fn test_expand_dollar_styles() {
        env::set_var("LOGSHIP_TEST_ROOT", "/var/log");
        env::set_var("LOGSHIP_TEST_APP", "portal");

        assert_eq!(
            expand_env_vars("$LOGSHIP_TEST_ROOT/${LOGSHIP_TEST_APP}/out"),
            "/var/log/portal/out"
        );
        assert_eq!(expand_env_vars("$LOGSHIP_TEST_ROOT-old"), "/var/log-old");

        env::remove_var("LOGSHIP_TEST_ROOT");
        env::remove_var("LOGSHIP_TEST_APP");
    }

    #[test]
    fn test_unknown_and_malformed_kept() {
        assert_eq!(expand_env_vars("%LOGSHIP_MISSING%\\x"), "%LOGSHIP_MISSING%\\x");
        assert_eq!(expand_env_vars("${LOGSHIP_MISSING}/x"), "${LOGSHIP_MISSING}/x");
        assert_eq!(expand_env_vars("$LOGSHIP_MISSING/x"), "$LOGSHIP_MISSING/x");
        assert_eq!(expand_env_vars("%incomplete"), "%incomplete");
        assert_eq!(expand_env_vars("${incomplete"), "${incomplete");
        assert_eq!(expand_env_vars("%%"), "%%");
        assert_eq!(expand_env_vars("$"), "$");
        assert_eq!(expand_env_vars("/plain/path"), "/plain/path");
    }
}
