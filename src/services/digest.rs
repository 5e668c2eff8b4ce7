// src/services/digest.rs

//! Plaintext digest rendering.

use crate::models::ProgressRecord;

/// First line of every digest.
pub const DIGEST_TITLE: &str = "LeetCode Progress Update";

/// Render progress records into the email body.
///
/// Layout per user:
///
/// ```text
/// User: alice
/// Problems Solved: 42
/// Current Streak: 7 days
/// Recent Problems:
/// - Two Sum
///
/// ```
pub fn format_digest(records: &[ProgressRecord]) -> String {
    let mut body = format!("{DIGEST_TITLE}\n\n");

    for record in records {
        body.push_str(&format!("User: {}\n", record.username));
        body.push_str(&format!("Problems Solved: {}\n", record.solved_count));
        body.push_str(&format!("Current Streak: {} days\n", record.current_streak));
        body.push_str("Recent Problems:\n");
        for problem in &record.recent_problems {
            body.push_str(&format!("- {problem}\n"));
        }
        body.push('\n');
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, solved: u64, streak: u64, problems: &[&str]) -> ProgressRecord {
        ProgressRecord {
            username: username.to_string(),
            solved_count: solved,
            recent_problems: problems.iter().map(|p| p.to_string()).collect(),
            current_streak: streak,
        }
    }

    #[test]
    fn test_exact_layout() {
        let digest = format_digest(&[
            record("alice", 42, 7, &["Two Sum", "Valid Parentheses"]),
            record("bob", 0, 0, &[]),
        ]);

        let expected = "LeetCode Progress Update\n\
                        \n\
                        User: alice\n\
                        Problems Solved: 42\n\
                        Current Streak: 7 days\n\
                        Recent Problems:\n\
                        - Two Sum\n\
                        - Valid Parentheses\n\
                        \n\
                        User: bob\n\
                        Problems Solved: 0\n\
                        Current Streak: 0 days\n\
                        Recent Problems:\n\
                        \n";
        assert_eq!(digest, expected);
    }

    #[test]
    fn test_empty_digest_is_title_only() {
        assert_eq!(format_digest(&[]), "LeetCode Progress Update\n\n");
    }

    #[test]
    fn test_deterministic() {
        let records = vec![record("alice", 3, 1, &["A"]), record("carol", 9, 4, &["B", "C"])];
        assert_eq!(format_digest(&records), format_digest(&records.clone()));
    }
}
