//! User-safe error text.

use std::sync::LazyLock;

use regex::Regex;

/// Absolute, drive-letter, or relative paths with at least two separators.
static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:[A-Za-z]:)?[\w.\-]*(?:[\\/][^\s\\/'"`,;()\[\]]+){2,}[\\/]?"#).unwrap()
});

/// Single-segment paths anchored by a root, drive, home or dot prefix.
static ROOTED_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|[\s(='"`\[])(?:[A-Za-z]:[\\/]|\.{1,2}[\\/]|~[\\/]|[\\/])[^\s'"`,;:()\[\]]+"#).unwrap()
});

static SECRET_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"sk-[a-zA-Z0-9_\-]{20,}").unwrap(), "[REDACTED]"),
        (Regex::new(r"Bearer [a-zA-Z0-9._\-]+").unwrap(), "[REDACTED]"),
        (
            Regex::new(r"(?i)((?:api[_-]?key|key|token|secret|password)=)[^\s&]+").unwrap(),
            "${1}[REDACTED]",
        ),
    ]
});

static MISSING_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)no such file|file not found|does not exist").unwrap()
});

static GW_IN_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])(?:gw|gameweek)[_/\\\-](\d{1,2})(?:[^0-9]|$)").unwrap()
});

/// Strip filesystem paths and secret-looking tokens from `message`.
pub fn sanitize_error(message: &str) -> String {
    let mut text = message.to_string();
    for (re, replacement) in SECRET_RES.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text = PATH_RE.replace_all(&text, "[path]").into_owned();
    text = ROOTED_PATH_RE.replace_all(&text, "${1}[path]").into_owned();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        "unknown error".to_string()
    } else {
        text
    }
}

/// Gameweek named by a missing-file error, if the error is one.
pub fn missing_gameweek(message: &str) -> Option<i64> {
    if !MISSING_FILE_RE.is_match(message) {
        return None;
    }
    GW_IN_ERROR_RE
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Fast-path reply for a failed tool call.
pub fn describe_failure(label: &str, message: &str) -> String {
    match missing_gameweek(message) {
        Some(gw) => freshness_notice(label, gw),
        None => format!("{label} is unavailable right now ({}).", sanitize_error(message)),
    }
}

/// Reply when a gameweek's data files have not been generated yet.
pub fn freshness_notice(label: &str, gw: i64) -> String {
    format!(
        "{label} for GW{gw} isn't available yet. The data for that gameweek hasn't been \
         refreshed; try again after the next data update or ask about an earlier gameweek."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_removed() {
        let out = sanitize_error(
            "open /srv/fpl/data/derived/summary/league/14204/gw/27.json: permission denied",
        );
        assert!(!out.contains("/srv"));
        assert!(!out.contains("summary"));
        assert!(out.contains("permission denied"));
    }

    #[test]
    fn single_segment_paths_are_removed() {
        assert_eq!(
            sanitize_error("open /bootstrap-static.json: permission denied"),
            "open [path]: permission denied"
        );
        assert_eq!(sanitize_error(r"cannot read C:\secrets.toml"), "cannot read [path]");
        assert_eq!(sanitize_error("read ./league.json failed"), "read [path] failed");
        assert_eq!(sanitize_error("stat ../league.json failed"), "stat [path] failed");
        assert_eq!(sanitize_error("no access to ~/.fplrc"), "no access to [path]");
        assert_eq!(sanitize_error("cannot list /home"), "cannot list [path]");
        assert_eq!(sanitize_error("ratio 3 / 4 and and/or"), "ratio 3 / 4 and and/or");

        let msg = describe_failure("Transactions", "open /transactions.json: permission denied");
        assert!(!msg.contains("transactions.json"), "{msg}");
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn windows_and_relative_paths_are_removed() {
        let out = sanitize_error(r"cannot read C:\fpl\data\raw\bootstrap.json");
        assert!(!out.contains("fpl"));
        let out = sanitize_error("cannot read data/raw/bootstrap/bootstrap-static.json now");
        assert!(!out.contains("bootstrap"));
        assert!(out.ends_with("now"));
    }

    #[test]
    fn secrets_are_redacted() {
        let out = sanitize_error("auth failed for api_key=abc123 with Bearer tok.en-1");
        assert!(!out.contains("abc123"));
        assert!(!out.contains("tok.en-1"));
    }

    #[test]
    fn plain_messages_survive() {
        assert_eq!(sanitize_error("file not found"), "file not found");
        assert_eq!(sanitize_error("   "), "unknown error");
    }

    #[test]
    fn missing_gameweek_file_detected() {
        assert_eq!(
            missing_gameweek("open data/derived/summary/league/14204/gw/27.json: no such file or directory"),
            Some(27)
        );
        assert_eq!(missing_gameweek("reports/gw_5/summary.md does not exist"), Some(5));
        assert_eq!(missing_gameweek("file not found"), None);
        assert_eq!(missing_gameweek("gw 5 timed out"), None);
        assert_eq!(missing_gameweek("summary/gameweek-3.json: no such file"), Some(3));
    }

    #[test]
    fn unrelated_errors_are_not_freshness_notices() {
        assert_eq!(missing_gameweek("entry 999 not found in league for gw 5"), None);
        assert_eq!(missing_gameweek("player missing from gw/5 squad"), None);
        assert_eq!(missing_gameweek("file not found for gw 5"), None);

        let msg = describe_failure("Waiver recommendations", "entry 999 not found in league for gw 5");
        assert_eq!(
            msg,
            "Waiver recommendations is unavailable right now (entry 999 not found in league for gw 5)."
        );
    }

    #[test]
    fn describe_failure_variants() {
        let msg = describe_failure("League summary", "file not found");
        assert!(msg.contains("unavailable"));
        assert!(msg.contains("file not found"));

        let msg = describe_failure(
            "Transactions",
            "/data/derived/summary/transactions/1/gw/9.json: no such file",
        );
        assert!(msg.contains("GW9"));
        assert!(!msg.contains("/data"));
    }
}
