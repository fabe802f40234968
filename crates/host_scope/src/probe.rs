//! Script-facing probes and the log they write to.
//!
//! Each probe mirrors one line of a fixture script (`log(typeof Blob)`,
//! `log(new Blob())`, ...) and writes exactly what that script would log.

use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use std::sync::{Mutex, PoisonError};

use log::info;
use serde::Deserialize;

use crate::engine::HostScopeEngine;
use crate::error::{ConfigurationError, HostScopeError};
use crate::identity::BrowserIdentity;

/// One observable property of a host class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Probe {
    /// `typeof X`
    #[serde(rename = "typeof")]
    TypeOf,
    /// `typeof window.X`
    #[serde(rename = "window-typeof")]
    PropertyTypeOf,
    /// `String(X)`
    #[serde(rename = "class-name")]
    ClassName,
    /// Every constant, one `name:value` line each.
    #[serde(rename = "constants")]
    Constants,
    /// `new X()`
    #[serde(rename = "construct")]
    Construct,
}

impl Probe {
    pub const ALL: [Self; 5] = [
        Self::TypeOf,
        Self::PropertyTypeOf,
        Self::ClassName,
        Self::Constants,
        Self::Construct,
    ];

    #[inline]
    pub const fn token(self) -> &'static str {
        match self {
            Self::TypeOf => "typeof",
            Self::PropertyTypeOf => "window-typeof",
            Self::ClassName => "class-name",
            Self::Constants => "constants",
            Self::Construct => "construct",
        }
    }
}

impl Display for Probe {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.token())
    }
}

impl FromStr for Probe {
    type Err = ConfigurationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|probe| probe.token() == token.trim())
            .ok_or_else(|| ConfigurationError::Malformed(format!("unknown probe '{token}'")))
    }
}

/// Receives the lines a probe logs.
pub trait ProbeSink: Send + Sync {
    /// Record one logged line.
    fn log(&self, line: &str);
}

/// Collects logged lines in order and forwards each one to the `log` facade.
#[derive(Debug, Default)]
pub struct ProbeLog {
    lines: Mutex<Vec<String>>,
}

impl ProbeLog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every line logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consume the log, joining lines with `\n`.
    pub fn into_output(self) -> String {
        self.lines
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .join("\n")
    }
}

impl ProbeSink for ProbeLog {
    fn log(&self, line: &str) {
        info!("[JS]: {line}");
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
    }
}

/// Run `probe` against `class_name` and write its lines to `sink`.
///
/// # Errors
/// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
pub fn run_probe(
    engine: &HostScopeEngine<'_>,
    identity: BrowserIdentity,
    class_name: &str,
    probe: Probe,
    sink: &dyn ProbeSink,
) -> Result<(), HostScopeError> {
    match probe {
        Probe::TypeOf | Probe::PropertyTypeOf => {
            sink.log(engine.scope(identity, class_name)?.type_of());
        }
        Probe::ClassName => {
            sink.log(&engine.scope(identity, class_name)?.class_name_string(identity, class_name));
        }
        Probe::Constants => {
            for constant in engine.constants(identity, class_name)? {
                sink.log(&constant.to_string());
            }
        }
        Probe::Construct => sink.log(engine.construct(identity, class_name)?.render()),
    }
    Ok(())
}

/// Run one probe and return everything it logged, joined with `\n`.
///
/// # Errors
/// Returns [`HostScopeError::UnknownClass`] if the class is not registered.
pub fn probe_output(
    engine: &HostScopeEngine<'_>,
    identity: BrowserIdentity,
    class_name: &str,
    probe: Probe,
) -> Result<String, HostScopeError> {
    let log = ProbeLog::new();
    run_probe(engine, identity, class_name, probe, &log)?;
    Ok(log.into_output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClassDescriptor, ConstantDescriptor, ConstructorKind};
    use crate::identity::BrowserFamily::{Chrome, Firefox, FirefoxEsr, InternetExplorer};
    use crate::predicate::CapabilityPredicate;
    use crate::registry::ClassRegistry;

    fn registry() -> Result<ClassRegistry, HostScopeError> {
        Ok(ClassRegistry::from_descriptors([
            ClassDescriptor::new("Node")
                .with_constructor(CapabilityPredicate::always(ConstructorKind::ConstructibleThrows))
                .with_constant(ConstantDescriptor::new("TEXT_NODE", 3))
                .with_constant(ConstantDescriptor::new("ELEMENT_NODE", 1)),
            ClassDescriptor::new("BatteryManager")
                .with_global(CapabilityPredicate::always(true).with_family(Firefox, false))
                .with_constructor(CapabilityPredicate::always(ConstructorKind::ConstructibleThrows)),
        ])?)
    }

    #[test]
    fn probes_log_what_a_script_would() -> Result<(), HostScopeError> {
        let registry = registry()?;
        let engine = HostScopeEngine::new(&registry);
        let chrome = BrowserIdentity::current(Chrome);
        let firefox = BrowserIdentity::current(Firefox);

        assert_eq!(probe_output(&engine, chrome, "Node", Probe::TypeOf)?, "function");
        assert_eq!(
            probe_output(&engine, chrome, "Node", Probe::Constants)?,
            "ELEMENT_NODE:1\nTEXT_NODE:3"
        );
        assert_eq!(probe_output(&engine, chrome, "Node", Probe::Construct)?, "TypeError");
        assert_eq!(
            probe_output(&engine, firefox, "BatteryManager", Probe::PropertyTypeOf)?,
            "undefined"
        );
        assert_eq!(
            probe_output(&engine, firefox, "BatteryManager", Probe::ClassName)?,
            "ReferenceError"
        );
        assert_eq!(
            probe_output(&engine, firefox, "BatteryManager", Probe::Constants)?,
            ""
        );
        Ok(())
    }

    #[test]
    fn class_name_follows_the_browser() -> Result<(), HostScopeError> {
        let registry = ClassRegistry::from_descriptors([ClassDescriptor::new("Blob")
            .with_constructor(CapabilityPredicate::always(ConstructorKind::Constructible))])?;
        let engine = HostScopeEngine::new(&registry);

        for family in [Chrome, InternetExplorer] {
            assert_eq!(
                probe_output(&engine, BrowserIdentity::current(family), "Blob", Probe::ClassName)?,
                "function Blob() { [native code] }"
            );
        }
        for family in [Firefox, FirefoxEsr] {
            assert_eq!(
                probe_output(&engine, BrowserIdentity::current(family), "Blob", Probe::ClassName)?,
                "function Blob() {\n    [native code]\n}"
            );
        }
        Ok(())
    }

    #[test]
    fn probe_log_keeps_lines_in_order() {
        let log = ProbeLog::new();
        log.log("first");
        log.log("second");
        assert_eq!(log.lines(), ["first", "second"]);
        assert_eq!(log.into_output(), "first\nsecond");
    }

    #[test]
    fn probe_tokens_parse() {
        for probe in Probe::ALL {
            assert_eq!(probe.token().parse::<Probe>(), Ok(probe));
        }
        assert_eq!(
            "typeof-ish".parse::<Probe>(),
            Err(ConfigurationError::Malformed("unknown probe 'typeof-ish'".to_owned()))
        );
    }
}
