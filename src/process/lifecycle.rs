//! Lifecycle script client.
//!
//! Every PA operation becomes `<interpreter> <script> <verb> <name> [flags]`.
//! Values are passed as separate arguments and never joined into a string.

use std::time::Duration;

use crate::config::LifecycleConfig;
use crate::process::invoker::{CommandResult, ProcessInvoker};
use crate::validation::{PaName, Template};

/// Timeout class for a lifecycle invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    /// Status, list, config and start/stop/restart.
    Default,
    /// Creation, which may fetch a container image.
    Extended,
}

/// Arguments for `create`.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub member: Option<String>,
    pub team: Option<String>,
}

/// Arguments for `config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub template: Option<Template>,
    pub gateway_token: Option<String>,
}

/// Simple transitions that take only a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Stop,
    Restart,
}

impl Transition {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Past tense used in success messages.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
        }
    }
}

/// Runs the configured lifecycle script.
#[derive(Debug, Clone)]
pub struct LifecycleScript {
    config: LifecycleConfig,
    invoker: ProcessInvoker,
}

impl LifecycleScript {
    pub fn new(config: LifecycleConfig, invoker: ProcessInvoker) -> Self {
        Self { config, invoker }
    }

    /// Path of the script being driven.
    pub fn script(&self) -> &str {
        &self.config.script
    }

    pub fn timeout(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Default => Duration::from_millis(self.config.default_timeout_ms),
            TimeoutClass::Extended => Duration::from_millis(self.config.create_timeout_ms),
        }
    }

    /// Run the script with a raw argument vector.
    pub async fn run(&self, argv: Vec<String>, class: TimeoutClass) -> CommandResult {
        tracing::debug!(script = %self.config.script, args = ?redacted_argv(&argv), "Running lifecycle script");
        let args = std::iter::once(self.config.script.clone()).chain(argv);
        self.invoker
            .run(&self.config.interpreter, args, self.timeout(class))
            .await
    }

    pub async fn create(&self, name: &PaName, opts: &CreateOptions) -> CommandResult {
        self.run(create_argv(name, opts), TimeoutClass::Extended).await
    }

    pub async fn configure(&self, name: &PaName, opts: &ConfigOptions) -> CommandResult {
        self.run(config_argv(name, opts), TimeoutClass::Default).await
    }

    pub async fn transition(&self, name: &PaName, transition: Transition) -> CommandResult {
        let argv = vec![transition.verb().to_string(), name.to_string()];
        self.run(argv, TimeoutClass::Default).await
    }

    pub async fn status(&self, name: &PaName) -> CommandResult {
        self.run(vec!["status".into(), name.to_string()], TimeoutClass::Default)
            .await
    }

    pub async fn list(&self) -> CommandResult {
        self.run(vec!["list".into()], TimeoutClass::Default).await
    }
}

pub fn create_argv(name: &PaName, opts: &CreateOptions) -> Vec<String> {
    let mut argv = vec!["create".to_string(), name.to_string()];
    if let Some(member) = &opts.member {
        argv.push("--member".into());
        argv.push(member.clone());
    }
    if let Some(team) = &opts.team {
        argv.push("--team".into());
        argv.push(team.clone());
    }
    argv
}

pub fn config_argv(name: &PaName, opts: &ConfigOptions) -> Vec<String> {
    let mut argv = vec!["config".to_string(), name.to_string()];
    if let Some(template) = opts.template {
        argv.push("--template".into());
        argv.push(template.as_str().into());
    }
    if let Some(token) = &opts.gateway_token {
        argv.push("--gateway-token".into());
        argv.push(token.clone());
    }
    argv
}

/// Argument vector with the value after `--gateway-token` masked.
fn redacted_argv(argv: &[String]) -> Vec<&str> {
    let mut out = Vec::with_capacity(argv.len());
    let mut mask_next = false;
    for arg in argv {
        out.push(if mask_next { "***" } else { arg.as_str() });
        mask_next = arg == "--gateway-token";
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> PaName {
        PaName::parse(Some(raw)).unwrap()
    }

    #[test]
    fn test_create_argv() {
        assert_eq!(create_argv(&name("alice"), &CreateOptions::default()), ["create", "alice"]);
        let opts = CreateOptions {
            member: Some("Alice Smith".into()),
            team: Some("ops".into()),
        };
        assert_eq!(
            create_argv(&name("alice"), &opts),
            ["create", "alice", "--member", "Alice Smith", "--team", "ops"]
        );
    }

    #[test]
    fn test_config_argv() {
        let opts = ConfigOptions {
            template: Some(Template::Admin),
            gateway_token: Some("tok".into()),
        };
        assert_eq!(
            config_argv(&name("bob"), &opts),
            ["config", "bob", "--template", "pa-admin", "--gateway-token", "tok"]
        );
    }

    #[test]
    fn test_redacted_argv() {
        let argv: Vec<String> = ["config", "bob", "--gateway-token", "tok"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(redacted_argv(&argv), ["config", "bob", "--gateway-token", "***"]);
    }

    #[tokio::test]
    async fn test_runs_script_through_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("pactl.sh");
        std::fs::write(&script, "echo \"args:$*\"\n").unwrap();

        let lifecycle = LifecycleScript::new(
            LifecycleConfig {
                interpreter: "bash".into(),
                script: script.to_string_lossy().into_owned(),
                default_timeout_ms: 10_000,
                create_timeout_ms: 20_000,
            },
            ProcessInvoker::new(),
        );

        let result = lifecycle.transition(&name("carol"), Transition::Restart).await;
        assert!(result.ok);
        assert_eq!(result.stdout, "args:restart carol");
        assert_eq!(lifecycle.timeout(TimeoutClass::Extended), Duration::from_secs(20));
    }
}
