//! Implementation of the `ragloom demo` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::Path;

use crate::application::{run_demos, AppContext, DemoReport};
use crate::cli::output::{output, CommandOutput};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Exit with an error if any demo fails
    #[arg(long)]
    pub strict: bool,
}

impl CommandOutput for DemoReport {
    fn to_human(&self) -> String {
        let rule = "=".repeat(80);
        let mut lines = Vec::new();
        for (number, section) in self.sections.iter().enumerate() {
            lines.push(rule.clone());
            lines.push(
                style(format!("DEMO {}: {}", number + 1, section.title))
                    .bold()
                    .cyan()
                    .to_string(),
            );
            lines.push(rule.clone());
            for entry in &section.entries {
                lines.push(format!("{} {}", style(format!("{}:", entry.label)).bold(), entry.value));
            }
            if let Some(error) = &section.error {
                lines.push(style(format!("Failed: {error}")).red().to_string());
            }
            lines.push(String::new());
        }

        let summary = match self.failures() {
            0 => style("Demo complete!".to_string()).green().bold(),
            n => style(format!("Demo finished with {n} failed section(s)")).yellow().bold(),
        };
        lines.push(summary.to_string());
        lines.join("\n")
    }
}

pub async fn execute(args: DemoArgs, json_mode: bool, config_path: Option<&Path>) -> Result<()> {
    let (config, _logger) = super::bootstrap(config_path)?;
    let context = AppContext::build(&config).context("Failed to initialize services")?;

    let report = run_demos(&context).await;
    output(&report, json_mode);

    if args.strict && report.failures() > 0 {
        anyhow::bail!("{} demo(s) failed", report.failures());
    }
    Ok(())
}
