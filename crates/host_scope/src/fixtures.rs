//! Per-browser expectation suites checked against an engine.

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use log::{debug, warn};
use serde::Deserialize;

use crate::engine::HostScopeEngine;
use crate::error::{ConfigurationError, HostScopeError};
use crate::identity::BrowserIdentity;
use crate::loader::{RawPredicate, convert_predicate};
use crate::predicate::CapabilityPredicate;
use crate::probe::{Probe, probe_output};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuite {
    cases: Vec<RawCase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCase {
    class: String,
    probe: Probe,
    expect: RawPredicate<String>,
}

/// One expectation: what `probe` logs for `class`, per browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCase {
    pub class: String,
    pub probe: Probe,
    pub expect: CapabilityPredicate<String>,
}

/// A case whose logged output differed from its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureMismatch {
    pub class: String,
    pub probe: Probe,
    pub expected: String,
    pub actual: String,
}

impl Display for FixtureMismatch {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(
            formatter,
            "{} [{}]: expected {:?}, got {:?}",
            self.class, self.probe, self.expected, self.actual
        )
    }
}

/// An ordered set of fixture cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSuite {
    cases: Vec<FixtureCase>,
}

impl FixtureSuite {
    #[inline]
    pub const fn new(cases: Vec<FixtureCase>) -> Self {
        Self { cases }
    }

    /// Decode a suite from JSON.
    ///
    /// # Errors
    /// Returns a [`ConfigurationError`] for undecodable text, unknown browser tokens, or
    /// duplicate overrides within one expectation.
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        let raw: RawSuite =
            serde_json::from_str(text).map_err(|error| ConfigurationError::Malformed(error.to_string()))?;
        let cases = raw
            .cases
            .into_iter()
            .map(|case| -> Result<FixtureCase, ConfigurationError> {
                let subject = format!("{}.{}", case.class, case.probe);
                Ok(FixtureCase {
                    expect: convert_predicate(case.expect, &subject, |text| text)?,
                    class: case.class,
                    probe: case.probe,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(cases))
    }

    /// Read and decode a suite from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture suite {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid fixture suite {}", path.display()))
    }

    #[inline]
    pub fn cases(&self) -> &[FixtureCase] {
        &self.cases
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Run every case under `identity` and return the ones that did not match.
    ///
    /// # Errors
    /// Returns [`HostScopeError::UnknownClass`] if a case names an unregistered class.
    pub fn check(
        &self,
        engine: &HostScopeEngine<'_>,
        identity: BrowserIdentity,
    ) -> Result<Vec<FixtureMismatch>, HostScopeError> {
        let mut mismatches = Vec::new();
        for case in &self.cases {
            let expected = case.expect.resolve(identity);
            let actual = probe_output(engine, identity, &case.class, case.probe)?;
            if *expected != actual {
                warn!(target: "host_scope", "{identity}: {} [{}] mismatch", case.class, case.probe);
                mismatches.push(FixtureMismatch {
                    class: case.class.clone(),
                    probe: case.probe,
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        debug!(
            target: "host_scope",
            "{identity}: {} of {} fixture cases matched",
            self.cases.len() - mismatches.len(),
            self.cases.len()
        );
        Ok(mismatches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClassDescriptor, ConstructorKind};
    use crate::identity::BrowserFamily::{Chrome, InternetExplorer};
    use crate::registry::ClassRegistry;

    const SUITE: &str = r#"{ "cases": [
        { "class": "Blob", "probe": "typeof", "expect": "function" },
        { "class": "Blob", "probe": "construct",
          "expect": { "default": "[object Blob]", "overrides": [ { "browser": "ie", "value": "TypeError" } ] } }
    ] }"#;

    fn registry() -> Result<ClassRegistry, HostScopeError> {
        Ok(ClassRegistry::from_descriptors([ClassDescriptor::new("Blob").with_constructor(
            CapabilityPredicate::always(ConstructorKind::Constructible)
                .with_family(InternetExplorer, ConstructorKind::ConstructibleThrows),
        )])?)
    }

    #[test]
    fn matching_suite_reports_nothing() -> Result<(), HostScopeError> {
        let registry = registry()?;
        let engine = HostScopeEngine::new(&registry);
        let suite = FixtureSuite::from_json(SUITE)?;
        assert_eq!(suite.len(), 2);
        assert!(suite.check(&engine, BrowserIdentity::current(Chrome))?.is_empty());
        assert!(suite.check(&engine, BrowserIdentity::version(InternetExplorer, 11))?.is_empty());
        Ok(())
    }

    #[test]
    fn mismatches_carry_both_sides() -> Result<(), HostScopeError> {
        let registry = ClassRegistry::from_descriptors([ClassDescriptor::new("Blob")])?;
        let engine = HostScopeEngine::new(&registry);
        let suite = FixtureSuite::from_json(SUITE)?;

        let mismatches = suite.check(&engine, BrowserIdentity::current(Chrome))?;
        assert_eq!(
            mismatches,
            [
                FixtureMismatch {
                    class: "Blob".to_owned(),
                    probe: Probe::TypeOf,
                    expected: "function".to_owned(),
                    actual: "object".to_owned(),
                },
                FixtureMismatch {
                    class: "Blob".to_owned(),
                    probe: Probe::Construct,
                    expected: "[object Blob]".to_owned(),
                    actual: "TypeError".to_owned(),
                },
            ]
        );
        assert_eq!(
            mismatches[0].to_string(),
            r#"Blob [typeof]: expected "function", got "object""#
        );
        Ok(())
    }

    #[test]
    fn unknown_probe_is_malformed() {
        let result = FixtureSuite::from_json(
            r#"{ "cases": [ { "class": "Blob", "probe": "instanceof", "expect": "true" } ] }"#,
        );
        assert!(matches!(result, Err(ConfigurationError::Malformed(_))));
    }
}
