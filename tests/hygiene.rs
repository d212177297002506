//! Hygiene — enforces coding standards at test time
//!
//! Scans the production sources under `src/` for antipatterns. Every pattern
//! carries a budget of zero; if one of these tests fails, fix the offending
//! code rather than raising the budget.

use std::fs;
use std::path::Path;

/// Forbidden source patterns and why they are forbidden.
const BANNED: &[(&str, &str)] = &[
    // Panics crash the whole engine; errors must propagate.
    (".unwrap()", "propagate the error instead of panicking"),
    (".expect(", "propagate the error instead of panicking"),
    ("panic!(", "the engine must stay interactive after any error"),
    ("unreachable!(", "make the match exhaustive instead"),
    ("todo!(", "finish the implementation before merging"),
    ("unimplemented!(", "finish the implementation before merging"),
    // Silent loss: discarding a Result hides storage and render failures.
    ("let _ =", "inspect or log the discarded value"),
    (".ok()", "handle the error instead of converting it away"),
    // Dead code should be deleted, not suppressed.
    ("#[allow(dead_code)]", "delete unused code"),
];

fn production_sources(dir: &Path, out: &mut Vec<(String, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            production_sources(&path, out);
            continue;
        }
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        if !name.ends_with(".rs") || name.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push((path.to_string_lossy().into_owned(), content));
        }
    }
}

fn violations(pattern: &str) -> Vec<String> {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    let mut hits = Vec::new();
    for (path, content) in &files {
        for (lineno, line) in content.lines().enumerate() {
            if line.contains(pattern) {
                hits.push(format!("  {path}:{}: {}", lineno + 1, line.trim()));
            }
        }
    }
    hits
}

#[test]
fn no_banned_patterns_in_production_sources() {
    let mut report = String::new();
    for (pattern, why) in BANNED {
        let hits = violations(pattern);
        if !hits.is_empty() {
            report.push_str(&format!("{pattern} ({why}):\n{}\n", hits.join("\n")));
        }
    }
    assert!(report.is_empty(), "banned patterns found:\n{report}");
}

#[test]
fn scan_sees_the_source_tree() {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    assert!(
        files.iter().any(|(path, _)| path.ends_with("engine.rs")),
        "hygiene scan found no production sources; was the crate layout moved?"
    );
}
