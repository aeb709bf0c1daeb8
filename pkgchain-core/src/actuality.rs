//! Checks whether declared dependency versions match what the dependencies
//! actually are right now.
//!
//! Exact equality against the version embedded in the declared range is the
//! default. Exempted dependencies and dependencies that sit in a cycle only
//! need to satisfy the declared range, unless exactness is forced.

use once_cell::sync::Lazy;
use regex::Regex;
use semver::{Version, VersionReq};
use serde::Serialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::graph::PackageNode;
use crate::manifest::ManifestSnapshot;

type Pattern = Lazy<std::result::Result<Regex, regex::Error>>;

static VERSION_TOKEN: Pattern = Lazy::new(|| Regex::new(r"\d+\.\d+\.\d+"));

static SPACED_OPERATOR: Pattern = Lazy::new(|| Regex::new(r"([<>=~^]+)\s+"));

fn compiled(pattern: &'static Pattern) -> Result<&'static Regex> {
    pattern
        .as_ref()
        .map_err(|e| Error::InvalidPattern(e.to_string()))
}

/// What a consumer needs to know about one of its dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyState {
    pub name: String,
    pub actual_version: Option<String>,
    pub self_accuracy_exempt: bool,
    pub in_cycle: bool,
}

impl DependencyState {
    pub fn new(name: impl Into<String>, actual_version: Option<String>) -> Self {
        Self {
            name: name.into(),
            actual_version,
            self_accuracy_exempt: false,
            in_cycle: false,
        }
    }

    pub fn from_manifest(manifest: &ManifestSnapshot, in_cycle: bool) -> Self {
        Self {
            name: manifest.name.clone(),
            actual_version: manifest.version.clone(),
            self_accuracy_exempt: manifest.exemptions.self_version_accuracy_exempt,
            in_cycle,
        }
    }

    pub fn from_node(node: &PackageNode) -> Self {
        Self::from_manifest(&node.manifest, node.participates_in_cycle)
    }

    pub fn with_self_accuracy_exempt(mut self, exempt: bool) -> Self {
        self.self_accuracy_exempt = exempt;
        self
    }

    pub fn with_in_cycle(mut self, in_cycle: bool) -> Self {
        self.in_cycle = in_cycle;
        self
    }
}

/// Outcome of checking a whole dependency set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActualityReport {
    pub all_actual: bool,
    /// Names of dependencies that need refreshing, in input order.
    pub stale_names: Vec<String>,
}

/// First `major.minor.patch` token inside a declared range.
pub fn exact_version_token(range: &str) -> Result<Option<&str>> {
    Ok(compiled(&VERSION_TOKEN)?.find(range).map(|m| m.as_str()))
}

fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim().trim_start_matches('=').trim_start_matches('v');
    Version::parse(trimmed).ok()
}

fn translate_comparator(token: &str) -> String {
    let split = token
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(token.len());
    let (operator, version) = token.split_at(split);
    let version = version.trim_start_matches('v');
    let wildcard = version.is_empty() || version.contains(['x', 'X', '*']);
    if operator.is_empty() && !wildcard {
        format!("={}", version)
    } else {
        format!("{}{}", operator, version)
    }
}

fn translate_alternative(alternative: &str) -> Result<Option<VersionReq>> {
    let alternative = alternative.trim();
    if alternative.is_empty() || alternative == "*" {
        return Ok(Some(VersionReq::STAR));
    }

    if let Some((low, high)) = alternative.split_once(" - ") {
        let low = low.trim().trim_start_matches('v');
        let high = high.trim().trim_start_matches('v');
        return Ok(VersionReq::parse(&format!(">={}, <={}", low, high)).ok());
    }

    let normalized = compiled(&SPACED_OPERATOR)?.replace_all(alternative, "$1");
    let comparators: Vec<String> = normalized
        .split_whitespace()
        .map(translate_comparator)
        .collect();
    Ok(VersionReq::parse(&comparators.join(", ")).ok())
}

/// npm-style range satisfaction. Unparsable ranges are never satisfied.
pub fn range_satisfied(version: &Version, range: &str) -> Result<bool> {
    let range = range.trim();
    let range = range.strip_prefix("workspace:").unwrap_or(range);
    let mut alternatives = Vec::new();
    for alternative in range.split("||") {
        match translate_alternative(alternative)? {
            Some(req) => alternatives.push(req),
            None => return Ok(false),
        }
    }
    Ok(alternatives.iter().any(|req| req.matches(version)))
}

fn same_version(exact: &Version, actual: &Version) -> bool {
    exact.major == actual.major
        && exact.minor == actual.minor
        && exact.patch == actual.patch
        && exact.pre == actual.pre
}

/// True when any version inside the declared range is good enough.
pub fn accepts_range(consumer: &ManifestSnapshot, dependency: &DependencyState, force_exact: bool) -> bool {
    !force_exact
        && (consumer.exempts_dependency(&dependency.name)
            || dependency.self_accuracy_exempt
            || dependency.in_cycle)
}

/// Whether `consumer`'s declared range for `dependency` is up to date.
///
/// # Errors
///
/// Returns [`Error::RangeNotFound`] if `consumer` does not declare the
/// dependency as a runtime or development dependency. A version mismatch is
/// a `false` result, never an error.
pub fn is_actual(consumer: &ManifestSnapshot, dependency: &DependencyState, force_exact: bool) -> Result<bool> {
    let range = consumer
        .declared_range(&dependency.name)
        .ok_or_else(|| Error::RangeNotFound {
            consumer: consumer.name.clone(),
            dependency: dependency.name.clone(),
        })?;

    let Some(exact) = exact_version_token(range)?.and_then(parse_version) else {
        return Ok(false);
    };
    let Some(actual) = dependency.actual_version.as_deref().and_then(parse_version) else {
        return Ok(false);
    };

    let relaxed = accepts_range(consumer, dependency, force_exact);
    let actual_enough = if relaxed {
        range_satisfied(&actual, range)?
    } else {
        same_version(&exact, &actual)
    };

    trace!(
        consumer = %consumer.name,
        dependency = %dependency.name,
        range,
        actual = %actual,
        relaxed,
        actual_enough,
        "actuality"
    );
    Ok(actual_enough)
}

/// Checks every dependency and collects the stale ones.
///
/// # Errors
///
/// Returns [`Error::RangeNotFound`] for the first dependency the consumer
/// does not declare.
pub fn check_actuality(
    consumer: &ManifestSnapshot,
    dependencies: &[DependencyState],
    force_exact: bool,
) -> Result<ActualityReport> {
    let mut stale_names = Vec::new();
    for dependency in dependencies {
        if !is_actual(consumer, dependency, force_exact)? {
            stale_names.push(dependency.name.clone());
        }
    }
    Ok(ActualityReport {
        all_actual: stale_names.is_empty(),
        stale_names,
    })
}
