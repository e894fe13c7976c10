//! `suna doctor` — prerequisite tool and port diagnostics.

use anyhow::Result;
use serde::Serialize;

use crate::command_runner::CommandRunner;
use crate::output::OutputContext;
use crate::ports;

/// Node.js major version the stack is known to work with.
const NODE_RECOMMENDED_MAJOR: u32 = 18;

const DOCKER_INSTALL_URL: &str = "https://docs.docker.com/get-docker/";
const NODE_INSTALL_URL: &str = "https://nodejs.org/";

/// Presence and reported version of one prerequisite tool.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCheck {
    /// Whether the binary could be executed at all.
    pub found: bool,
    /// Trimmed `--version` output, when the tool answered.
    pub version: Option<String>,
}

/// Everything `doctor` inspects.
#[derive(Debug, Serialize)]
pub struct DoctorChecks {
    pub docker: ToolCheck,
    pub node: ToolCheck,
    pub npm: ToolCheck,
    pub api_port_free: bool,
    pub frontend_port_free: bool,
}

impl DoctorChecks {
    /// Whether every tool `suna up` needs is present.
    #[must_use]
    pub fn tools_ok(&self) -> bool {
        self.docker.found && self.node.found && self.npm.found
    }
}

/// Probe one tool by running `<tool> --version`.
///
/// A binary that exists but fails `--version` is reported as found with
/// no version, matching "found but not responding".
async fn probe_tool(runner: &impl CommandRunner, program: &str) -> ToolCheck {
    match runner.run(program, &["--version"]).await {
        Ok(output) if output.status.success() => ToolCheck {
            found: true,
            version: Some(String::from_utf8_lossy(&output.stdout).trim().to_string()),
        },
        Ok(_) => ToolCheck {
            found: true,
            version: None,
        },
        Err(_) => ToolCheck::default(),
    }
}

/// Gather all checks.
pub async fn collect(runner: &impl CommandRunner) -> DoctorChecks {
    let (docker, node, npm) = tokio::join!(
        probe_tool(runner, "docker"),
        probe_tool(runner, "node"),
        probe_tool(runner, "npm"),
    );
    DoctorChecks {
        docker,
        node,
        npm,
        api_port_free: !ports::port_in_use(ports::API_PORT),
        frontend_port_free: !ports::port_in_use(ports::FRONTEND_PORT),
    }
}

/// Extract the major version from strings like `v20.11.0` or `10.2.3`.
#[must_use]
pub fn parse_major_version(version: &str) -> Option<u32> {
    version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .next()?
        .parse()
        .ok()
}

/// Run `suna doctor`.
///
/// # Errors
///
/// Returns an error if the JSON report cannot be serialized.
pub async fn run(ctx: &OutputContext, runner: &impl CommandRunner, json: bool) -> Result<()> {
    let checks = collect(runner).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
        return Ok(());
    }

    ctx.header("Checking the local development environment");
    println!();
    println!("Tools:");
    report_tools(ctx, &checks);
    println!();
    println!("Ports:");
    print_port(ctx, ports::API_PORT, "API", checks.api_port_free);
    print_port(ctx, ports::FRONTEND_PORT, "frontend", checks.frontend_port_free);
    println!();
    if checks.tools_ok() {
        ctx.success("All prerequisite tools are installed");
    } else {
        ctx.error("Some prerequisites are missing; install them before running `suna up`");
    }
    Ok(())
}

/// Prerequisite gate for `suna up`: docker and the Node toolchain must
/// be present. Reports each tool and returns `false` when something is
/// missing. Version recommendations are reported, never enforced.
pub async fn ensure_prerequisites(ctx: &OutputContext, runner: &impl CommandRunner) -> bool {
    ctx.header("Checking prerequisites...");
    let checks = collect(runner).await;
    report_tools(ctx, &checks);

    if !checks.docker.found {
        ctx.error("Docker is required before anything can start.");
        return false;
    }
    if !(checks.node.found && checks.npm.found) {
        ctx.error("Node.js and npm are required before anything can start.");
        return false;
    }
    true
}

fn report_tools(ctx: &OutputContext, checks: &DoctorChecks) {
    print_tool(ctx, "Docker", &checks.docker, DOCKER_INSTALL_URL);
    print_tool(ctx, "Node.js", &checks.node, NODE_INSTALL_URL);
    print_tool(ctx, "npm", &checks.npm, NODE_INSTALL_URL);

    if let Some(version) = &checks.node.version {
        if let Some(major) = parse_major_version(version) {
            if major < NODE_RECOMMENDED_MAJOR {
                ctx.warn(&format!(
                    "Node.js {version} is older than the recommended v{NODE_RECOMMENDED_MAJOR}+"
                ));
            }
        }
    }
}

fn print_tool(ctx: &OutputContext, label: &str, check: &ToolCheck, install_url: &str) {
    if check.found {
        match &check.version {
            Some(version) => ctx.success(&format!("{label}: {version}")),
            None => ctx.warn(&format!("{label} found, but it did not answer `--version`")),
        }
    } else {
        ctx.error(&format!("{label} not found. Install it from: {install_url}"));
    }
}

fn print_port(ctx: &OutputContext, port: u16, label: &str, free: bool) {
    if free {
        ctx.success(&format!("Port {port} ({label}) is free"));
    } else {
        ctx.warn(&format!("Port {port} ({label}) is already in use"));
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::path::Path;
    use std::process::{ExitStatus, Output};
    use std::time::Duration;

    /// Runner answering `--version` for a configured set of tools.
    struct FakeRunner {
        present: Vec<(&'static str, &'static str)>,
    }

    impl FakeRunner {
        fn with_tools(present: Vec<(&'static str, &'static str)>) -> Self {
            Self { present }
        }

        fn answer(&self, program: &str) -> Result<Output> {
            match self.present.iter().find(|(name, _)| *name == program) {
                Some((_, version)) => Ok(Output {
                    status: ExitStatus::from_raw(0),
                    stdout: format!("{version}\n").into_bytes(),
                    stderr: Vec::new(),
                }),
                None => anyhow::bail!("failed to spawn {program}"),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, program: &str, _args: &[&str]) -> Result<Output> {
            self.answer(program)
        }

        async fn run_with_timeout(
            &self,
            program: &str,
            _args: &[&str],
            _timeout: Duration,
        ) -> Result<Output> {
            self.answer(program)
        }

        async fn run_in_dir(
            &self,
            program: &str,
            _args: &[&str],
            _dir: &Path,
            _timeout: Duration,
        ) -> Result<Output> {
            self.answer(program)
        }
    }

    #[tokio::test]
    async fn test_collect_reports_present_tools_with_versions() {
        let runner = FakeRunner::with_tools(vec![
            ("docker", "Docker version 27.3.1, build ce1223035a"),
            ("node", "v20.11.0"),
            ("npm", "10.2.4"),
        ]);
        let checks = collect(&runner).await;
        assert!(checks.tools_ok());
        assert_eq!(checks.node.version.as_deref(), Some("v20.11.0"));
        assert_eq!(checks.npm.version.as_deref(), Some("10.2.4"));
    }

    #[tokio::test]
    async fn test_collect_reports_missing_tools() {
        let runner = FakeRunner::with_tools(vec![("node", "v20.11.0"), ("npm", "10.2.4")]);
        let checks = collect(&runner).await;
        assert!(!checks.docker.found);
        assert!(!checks.tools_ok());
    }

    #[tokio::test]
    async fn test_ensure_prerequisites_fails_without_node_toolchain() {
        let ctx = OutputContext::new(true, true);
        let runner = FakeRunner::with_tools(vec![("docker", "Docker version 27.3.1")]);
        assert!(!ensure_prerequisites(&ctx, &runner).await);
    }

    #[tokio::test]
    async fn test_ensure_prerequisites_passes_with_all_tools() {
        let ctx = OutputContext::new(true, true);
        let runner = FakeRunner::with_tools(vec![
            ("docker", "Docker version 27.3.1"),
            ("node", "v20.11.0"),
            ("npm", "10.2.4"),
        ]);
        assert!(ensure_prerequisites(&ctx, &runner).await);
    }

    #[test]
    fn test_parse_major_version_node_style() {
        assert_eq!(parse_major_version("v20.11.0"), Some(20));
        assert_eq!(parse_major_version("10.2.4"), Some(10));
        assert_eq!(parse_major_version("v16.20.2\n"), Some(16));
    }

    #[test]
    fn test_parse_major_version_rejects_prose() {
        assert_eq!(parse_major_version("Docker version 27.3.1"), None);
        assert_eq!(parse_major_version(""), None);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Arbitrary version strings never panic the parser.
            #[test]
            fn prop_parse_major_version_total(input in ".{0,40}") {
                let _ = parse_major_version(&input);
            }

            /// Well-formed semver-ish strings parse to their leading number.
            #[test]
            fn prop_parse_major_version_leading_number(
                major in 0u32..1000,
                minor in 0u32..1000,
            ) {
                let version = format!("v{major}.{minor}.0");
                prop_assert_eq!(parse_major_version(&version), Some(major));
            }
        }
    }
}
