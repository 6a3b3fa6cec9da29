//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.
//!
//! ## Groups
//!
//! ```text
//! 001 Group (2 items, ratio 2.500)
//!     001 Dawn 0.600
//!     002 (untitled) 0.400
//! 002 Group (1 item, ratio 0.800)
//!     001 Dusk 1.000
//! ```
//!
//! ## Srcset
//!
//! ```text
//! 400w  https://assist.example.com/site/transform/w:400/abc.jpg
//! 800w  https://assist.example.com/site/transform/w:800/abc.jpg
//! ```

use crate::grouping::{Entity, Group};
use crate::settings::Settings;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display title for an entity: `title`, then `name`, then `(untitled)`.
fn entity_title(entity: &Entity) -> String {
    ["title", "name"]
        .iter()
        .find_map(|key| entity.fields.get(*key).and_then(|v| v.as_str()))
        .filter(|t| !t.is_empty())
        .unwrap_or("(untitled)")
        .to_string()
}

pub fn format_groups(groups: &[Group]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let noun = if group.len() == 1 { "item" } else { "items" };
        lines.push(format!(
            "{} Group ({} {noun}, ratio {:.3})",
            format_index(i + 1),
            group.len(),
            group.ratio
        ));
        for (j, member) in group.entities.iter().enumerate() {
            lines.push(format!(
                "{}{} {} {:.3}",
                indent(1),
                format_index(j + 1),
                entity_title(&member.entity),
                member.group_ratio
            ));
        }
    }
    lines
}

pub fn print_groups(groups: &[Group]) {
    for line in format_groups(groups) {
        println!("{}", line);
    }
}

/// One `"<width>w  <url>"` line per srcset candidate.
///
/// An entry without a trailing `<digits>w` descriptor is printed as is.
pub fn format_srcset(srcset: &str) -> Vec<String> {
    srcset
        .split(", ")
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.rsplit_once(' ') {
            Some((url, width)) if is_width_descriptor(width) => format!("{width}  {url}"),
            _ => entry.to_string(),
        })
        .collect()
}

fn is_width_descriptor(s: &str) -> bool {
    s.strip_suffix('w')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

pub fn print_srcset(srcset: &str) {
    for line in format_srcset(srcset) {
        println!("{}", line);
    }
}

pub fn format_settings(settings: &Settings) -> Vec<String> {
    settings
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect()
}

pub fn print_settings(settings: &Settings) {
    for line in format_settings(settings) {
        println!("{}", line);
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
