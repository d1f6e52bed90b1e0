//! Git output parsing helpers.

use std::process::Output;

use super::types::{FileStatus, GitStatus};

/// Formats a git error with both stdout and stderr.
pub fn format_git_error(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

    match (stderr.is_empty(), stdout.is_empty()) {
        (true, true) => format!(
            "Command failed with exit code {}",
            output.status.code().unwrap_or(-1)
        ),
        (true, false) => stdout,
        (false, true) => stderr,
        (false, false) => format!("{}\n{}", stderr, stdout),
    }
}

/// Branch name from a `## branch...upstream [ahead n]` header line.
pub fn extract_branch(line: &str) -> Option<String> {
    let rest = line.strip_prefix("## ")?;
    let rest = rest.strip_prefix("No commits yet on ").unwrap_or(rest);
    let name = rest
        .split("...")
        .next()?
        .split_whitespace()
        .next()?
        .to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Parses `git status --porcelain -b`.
pub fn parse_porcelain_status(text: &str) -> GitStatus {
    let mut status = GitStatus::default();

    for line in text.lines() {
        if line.starts_with("##") {
            status.branch = extract_branch(line);
            continue;
        }
        if line.len() < 3 {
            continue;
        }

        let index_status = line.chars().next().unwrap_or(' ');
        let worktree_status = line.chars().nth(1).unwrap_or(' ');
        let file_path = unquote(line[3..].trim());

        // renames are reported as "R  old -> new"
        let path = file_path
            .split(" -> ")
            .last()
            .unwrap_or(&file_path)
            .to_string();

        if line.starts_with("??") {
            status.untracked_files.push(path.clone());
            status.files.push(FileStatus {
                path,
                status: '?',
                staged: false,
            });
            continue;
        }

        let (code, staged) = if worktree_status == 'D' {
            ('D', false)
        } else if index_status != ' ' && index_status != '?' {
            (index_status, true)
        } else if worktree_status != ' ' {
            (worktree_status, false)
        } else {
            continue;
        };

        status.modified_files.push(path.clone());
        status.files.push(FileStatus {
            path,
            status: code,
            staged,
        });
    }

    status.is_clean = status.modified_files.is_empty() && status.untracked_files.is_empty();
    status
}

/// Splits NUL separated `git ls-files -z` output.
pub fn split_nul(output: &[u8]) -> Vec<String> {
    output
        .split(|b| *b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned())
        .collect()
}

fn unquote(path: &str) -> String {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
        .to_string()
}
