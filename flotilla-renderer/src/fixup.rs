//! Textual repair pass over serialized YAML.
//!
//! The emitter writes a deferred trailing comment at the column of the next
//! line it emits, so a comment trailing the last step lands at column 0 at
//! the end of the document; leading comments are set off by a blank line.
//! This pass moves both into the step list, line by line, after serialization.
//!
//! Corrections, in a single forward scan:
//!
//! 1. `# yamllint enable rule:line-length` at column 0 is re-indented to the
//!    step depth ([`STEP_COMMENT_INDENT`]); a blank line right before it is dropped.
//! 2. The same comment attached to a sequence dash (`- # yamllint enable ...`)
//!    gets the same treatment.
//! 3. A blank line directly after a line that is only `steps:` is dropped.
//!
//! Input that matches none of these passes through unchanged. This never fails.

use std::sync::LazyLock;

use regex::Regex;

/// Comment re-enabling the line-length lint after the long step.
pub const LINE_LENGTH_ENABLE: &str = "# yamllint enable rule:line-length";

/// Column of the step list in the canonical workflow (`jobs.<id>.steps[*]`).
pub const STEP_COMMENT_INDENT: usize = 6;

#[allow(clippy::expect_used)]
static DASHED_ENABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-\s*#\s*yamllint enable rule:line-length")
        .expect("constant regex pattern is valid")
});

/// Apply all corrections to `yaml`.
pub fn fix_misplaced_comments(yaml: &str) -> String {
    let lines: Vec<&str> = yaml.split('\n').collect();
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut skip_next = false;

    for (i, line) in lines.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }

        if *line == LINE_LENGTH_ENABLE || DASHED_ENABLE.is_match(line) {
            if result.last().is_some_and(|prev| prev.is_empty()) {
                result.pop();
            }
            result.push(format!(
                "{:indent$}{LINE_LENGTH_ENABLE}",
                "",
                indent = STEP_COMMENT_INDENT
            ));
            continue;
        }

        if line.trim() == "steps:" {
            result.push((*line).to_string());
            if lines.get(i + 1).is_some_and(|next| next.is_empty()) {
                skip_next = true;
            }
            continue;
        }

        result.push((*line).to_string());
    }

    result.join("\n")
}
