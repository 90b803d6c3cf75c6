//! Parsing of dpkg and apt-cache output

use regex::Regex;

use crate::modules::error::PackageManagerError;

/// Line `dpkg --status` prints for a fully installed package
pub const PACKAGE_INSTALLED_STATUS: &str = "Status: install ok installed";

/// Names containing `*` or `.` stand for a family of packages
pub fn is_pattern_name(name: &str) -> bool {
    name.contains('*') || name.contains('.')
}

/// Anchored pattern passed verbatim to `apt-cache search`
pub fn search_expression(name: &str) -> String {
    format!("^{name}$")
}

/// How a package name is compared against selection entries
#[derive(Debug, Clone)]
pub enum NameMatcher {
    Exact(String),
    Pattern(Regex),
}

impl NameMatcher {
    pub fn for_name(name: &str) -> Result<Self, PackageManagerError> {
        if !is_pattern_name(name) {
            return Ok(NameMatcher::Exact(name.to_string()));
        }

        let expr = pattern_regex(name);
        Regex::new(&expr)
            .map(NameMatcher::Pattern)
            .map_err(|e| PackageManagerError::InvalidPattern {
                pattern: name.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            NameMatcher::Exact(name) => name == candidate,
            NameMatcher::Pattern(re) => re.is_match(candidate),
        }
    }
}

/// Basic-regex reading of a package pattern: `.` is any character, `*`
/// repeats the previous atom, everything else is literal. A leading `*`
/// has nothing to repeat and is literal, as in grep.
fn pattern_regex(name: &str) -> String {
    let mut expr = String::with_capacity(name.len() + 8);
    expr.push('^');
    let mut has_atom = false;
    let mut after_star = false;

    for ch in name.chars() {
        match ch {
            '*' if has_atom => {
                // a** == a*
                if !after_star {
                    expr.push('*');
                }
                after_star = true;
                continue;
            }
            '.' => expr.push('.'),
            other => {
                let mut buf = [0u8; 4];
                expr.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
        has_atom = true;
        after_star = false;
    }

    expr.push('$');
    expr
}

/// Names from `dpkg --get-selections`, skipping entries marked for removal
pub fn selected_packages(output: &str) -> impl Iterator<Item = &str> {
    output
        .lines()
        .filter(|line| !line.contains("deinstall"))
        .filter_map(|line| line.split_whitespace().next())
}

/// Package names from `apt-cache search` lines (`name - description`)
pub fn search_results(output: &str) -> impl Iterator<Item = &str> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
}

pub fn has_installed_status(status_output: &str) -> bool {
    status_output
        .lines()
        .any(|line| line.trim_end() == PACKAGE_INSTALLED_STATUS)
}
