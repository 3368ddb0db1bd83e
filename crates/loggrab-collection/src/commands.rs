//! Shell commands run on the remote host.
//!
//! Paths are quoted for a POSIX shell. The file name part of a log pattern
//! is the one exception: it is escaped character by character, leaving the
//! wildcards `*`, `?`, `[` and `]` bare so the remote shell expands them.

use crate::config::LogPattern;
use shell_words::quote;

/// Join a remote directory and a file name with exactly one `/`.
pub fn join_remote(directory: &str, name: &str) -> String {
    if directory.ends_with('/') {
        format!("{}{}", directory, name)
    } else {
        format!("{}/{}", directory, name)
    }
}

/// List the regular files matching a pattern, one bare file name per line.
///
/// Exits non-zero when nothing matches.
pub fn list_logs(pattern: &LogPattern) -> String {
    let directory = pattern.path_to_log.trim_end_matches('/');
    format!(
        "find {}/{} -maxdepth 0 -type f -printf '%f\\n'",
        quote(directory),
        escape_glob(&pattern.log_name)
    )
}

/// Backslash-escape everything in a file name glob except the wildcards.
pub fn escape_glob(glob: &str) -> String {
    let mut escaped = String::with_capacity(glob.len());
    for c in glob.chars() {
        let bare = c.is_ascii_alphanumeric() || "*?[]!^._-+@%,:=".contains(c);
        if !bare {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Print the number of lines of a file.
pub fn count_lines(path: &str) -> String {
    format!("wc -l < {}", quote(path))
}

/// Copy every line from `first_line` (1-based) to the end of `path` into
/// `destination`.
pub fn cut_tail(path: &str, first_line: u64, destination: &str) -> String {
    format!("tail -n +{} {} > {}", first_line, quote(path), quote(destination))
}

/// Compress `path` in place to `path.gz`.
pub fn compress(path: &str) -> String {
    format!("gzip -f {}", quote(path))
}

/// Remove files, ignoring the ones already gone.
pub fn remove(paths: &[&str]) -> String {
    let quoted: Vec<_> = paths.iter().map(|p| quote(p)).collect();
    format!("rm -f {}", quoted.join(" "))
}

/// Parse `wc -l` output.
pub fn parse_line_count(output: &str) -> Option<u64> {
    output.split_whitespace().next()?.parse().ok()
}

/// Split `find -printf '%f\n'` output into file names.
pub fn parse_file_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
