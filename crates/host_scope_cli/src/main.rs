//! Command-line reports over the host class registry.
//!
//! Prints the global scope of a browser, runs single probes, and checks fixture suites.

use anyhow::{Result, anyhow};
use host_scope::{
    BrowserIdentity, FixtureSuite, HostScopeConfig, HostScopeEngine, Probe, ProbeLog, run_probe,
};
use log::info;
use std::env;
use std::io::{Write as _, stderr, stdout};
use std::path::Path;

/// Parsed `--flag value` pairs following a command.
struct Flags {
    pairs: Vec<(String, String)>,
}

impl Flags {
    /// Collect `--flag value` pairs, skipping anything else.
    fn parse(args: &[String]) -> Self {
        let mut pairs = Vec::new();
        let mut index = 0;
        while index < args.len() {
            if args[index].starts_with("--") && index + 1 < args.len() {
                pairs.push((args[index].clone(), args[index + 1].clone()));
                index += 2;
            } else {
                index += 1;
            }
        }
        Self { pairs }
    }

    fn get(&self, flag: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == flag)
            .map(|(_, value)| value.as_str())
    }

    fn require(&self, flag: &str) -> Result<&str> {
        self.get(flag).ok_or_else(|| anyhow!("{flag} is required"))
    }

    /// The identities named by `--browser`, falling back to the configured default.
    /// `all` selects the current release of every family.
    fn browsers(&self, config: &HostScopeConfig) -> Result<Vec<BrowserIdentity>> {
        match self.get("--browser") {
            Some("all") => Ok(BrowserIdentity::all_current().collect()),
            Some(token) => Ok(vec![token.parse::<BrowserIdentity>()?]),
            None => Ok(vec![config.default_browser]),
        }
    }
}

/// Print every global binding for each selected browser.
///
/// # Errors
/// Returns an error if writing to stdout fails.
fn cmd_scope(engine: &HostScopeEngine<'_>, browsers: &[BrowserIdentity]) -> Result<()> {
    let mut out = stdout().lock();
    for identity in browsers {
        let scope = engine.global_scope(*identity);
        writeln!(out, "# {identity} ({} globals)", scope.len())?;
        for (name, entry) in scope.entries() {
            writeln!(out, "{name}: {entry}")?;
        }
    }
    Ok(())
}

/// Run one probe against one class and print what it logged.
///
/// # Errors
/// Returns an error if the class is unknown or writing fails.
fn cmd_probe(
    engine: &HostScopeEngine<'_>,
    browsers: &[BrowserIdentity],
    class_name: &str,
    probe: Probe,
) -> Result<()> {
    let mut out = stdout().lock();
    for identity in browsers {
        let log = ProbeLog::new();
        run_probe(engine, *identity, class_name, probe, &log)?;
        writeln!(out, "# {identity}")?;
        for line in log.lines() {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

/// Check a fixture suite and report every mismatch.
///
/// # Errors
/// Returns an error if the suite cannot be loaded, names an unknown class, or any case fails.
fn cmd_fixtures(
    engine: &HostScopeEngine<'_>,
    browsers: &[BrowserIdentity],
    file: &str,
) -> Result<()> {
    let suite = FixtureSuite::from_path(Path::new(file))?;
    let mut failures = 0usize;
    for identity in browsers {
        let mismatches = suite.check(engine, *identity)?;
        for mismatch in &mismatches {
            writeln!(stderr(), "{identity}: {mismatch}")?;
        }
        writeln!(
            stdout(),
            "{identity}: {}/{} cases passed",
            suite.len() - mismatches.len(),
            suite.len()
        )?;
        failures += mismatches.len();
    }
    if failures > 0 {
        return Err(anyhow!("{failures} fixture cases failed"));
    }
    Ok(())
}

/// Print usage information to stderr.
fn print_usage() {
    drop(writeln!(
        stderr(),
        "Usage:\n  hostscope scope [--browser <BROWSER|all>]\n  hostscope probe --class <CLASS> --probe <typeof|window-typeof|class-name|constants|construct> [--browser <BROWSER|all>]\n  hostscope fixtures --file <SUITE.json> [--browser <BROWSER|all>]"
    ));
}

/// Main entry point for the hostscope CLI tool.
///
/// # Errors
/// Returns an error if command parsing or execution fails.
fn main() -> Result<()> {
    env_logger::init();
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return Err(anyhow!("missing command"));
    }
    let cmd = args.remove(0);
    let flags = Flags::parse(&args);

    let config = HostScopeConfig::from_env();
    let registry = config.load_registry()?;
    let engine = HostScopeEngine::from_config(&registry, &config);
    let browsers = flags.browsers(&config)?;
    info!(
        "hostscope {cmd}: {} classes, {} browsers",
        registry.len(),
        browsers.len()
    );

    match cmd.as_str() {
        "scope" => cmd_scope(&engine, &browsers),
        "probe" => {
            let class_name = flags.require("--class")?;
            let probe = flags.require("--probe")?.parse::<Probe>()?;
            cmd_probe(&engine, &browsers, class_name, probe)
        }
        "fixtures" => cmd_fixtures(&engine, &browsers, flags.require("--file")?),
        _ => {
            print_usage();
            Err(anyhow!("unknown command"))
        }
    }
}
