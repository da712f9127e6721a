//! Command handlers.

use crate::config::CliConfig;
use console::style;
use crucible_core::instance::JobInstance;
use crucible_core::stage::InstanceStatus;
use crucible_core::template::JobDefinition;
use crucible_matrix::{MatrixResolver, default_rules};
use crucible_runner::{HardwareGate, ShellRunner, StageSettings, run_all, stages};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Initialize a new job template.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new("crucible.yaml");

    if path.exists() {
        println!("{} crucible.yaml already exists", style("!").yellow());
        return Ok(());
    }

    let template = r#"# Adapter under test, e.g. L0, CUDA, HIP, OPENCL
adapter_name: CUDA
# Runner label the job is dispatched to
runner_name: CUDA_A100

# Optional second adapter built in the same instance
# co_adapter_name: OPENCL

# Vendor platform override; leave empty on default runners
platform: ""

static_loader: "OFF"
static_adapter: "OFF"

# Extra exclusions, applied on top of the built-in rule set
# exclude:
#   - build_type: Release
#     reason: local runs are Debug-only
"#;

    std::fs::write(path, template)?;
    println!("{} Created crucible.yaml", style("✓").green());
    Ok(())
}

fn load_definition(path: &str) -> Result<JobDefinition, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let definition: JobDefinition = serde_yaml::from_str(&content)?;
    Ok(definition)
}

fn resolve_definition(
    definition: &JobDefinition,
) -> Result<Vec<JobInstance>, Box<dyn std::error::Error>> {
    let mut rules = default_rules();
    rules.extend(definition.exclude.iter().cloned());

    let instances =
        MatrixResolver::new().resolve(&definition.template, &definition.axes, &rules)?;
    Ok(instances)
}

/// Validate a job template.
pub async fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let definition = load_definition(path)?;
    definition.template.validate()?;

    println!(
        "{} Job template \"{}\" is valid",
        style("✓").green(),
        definition.template.adapter_name
    );
    println!("  Runner: {}", definition.template.runner_name);
    println!("  Candidate combinations: {}", definition.axes.combination_count());
    if !definition.exclude.is_empty() {
        println!("  Extra exclusions: {}", definition.exclude.len());
    }

    Ok(())
}

/// Resolve the build matrix and print the surviving instances.
pub async fn resolve(path: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let definition = load_definition(path)?;
    let instances = resolve_definition(&definition)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&instances)?);
        return Ok(());
    }

    println!(
        "{} {} of {} combinations survive exclusion",
        style("▶").cyan(),
        instances.len(),
        definition.axes.combination_count()
    );

    for instance in &instances {
        let mut notes = Vec::new();
        if instance.flags.multi_adapter {
            notes.push("multi-adapter".to_string());
        }
        if let Some(hip) = &instance.flags.hip {
            notes.push(format!("arch {}", hip.arch));
        }
        if instance.flags.skip_adapter_tests {
            notes.push("adapter tests skipped".to_string());
        }

        if notes.is_empty() {
            println!("  - {}", instance.display_name());
        } else {
            println!(
                "  - {} {}",
                instance.display_name(),
                style(format!("[{}]", notes.join(", "))).dim()
            );
        }
    }

    Ok(())
}

/// Resolve the build matrix and run every instance.
pub async fn run(
    config: &CliConfig,
    path: &str,
    workspace: Option<String>,
    hardware: bool,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let definition = load_definition(path)?;
    let instances = resolve_definition(&definition)?;

    let settings = StageSettings {
        source_dir: PathBuf::from(&config.source_dir),
        toolchain_command: config.toolchain_command.clone(),
        ..StageSettings::default()
    };

    if dry_run {
        for instance in &instances {
            println!("{} {}", style("▶").cyan(), style(instance.display_name()).bold());
            for command in stages::plan(instance, &settings) {
                println!("  {} {}", style(&command.label).dim(), command.script);
            }
        }
        return Ok(());
    }

    let gate = if hardware {
        HardwareGate::open()
    } else {
        HardwareGate::from_env(&config.hardware_var)
    };

    let workspace_root = PathBuf::from(workspace.unwrap_or_else(|| config.workspace.clone()));

    println!(
        "{} Running {} instance(s) under {}",
        style("▶").cyan(),
        instances.len(),
        workspace_root.display()
    );

    let runner = Arc::new(ShellRunner::default());
    let report = run_all(instances, gate, runner, &settings, &workspace_root).await;

    if !report.gate_open {
        println!(
            "{} Hardware unavailable, run skipped ({} instance(s))",
            style("⏭").yellow(),
            report.instances.len()
        );
        return Ok(());
    }

    println!();
    for instance in &report.instances {
        let glyph = match instance.status {
            InstanceStatus::Success => style("✓").green(),
            InstanceStatus::Failure => style("✗").red(),
            _ => style("⏭").yellow(),
        };
        println!(
            "  {} {} ({:.2}s)",
            glyph,
            instance.instance.display_name(),
            instance.duration_ms as f64 / 1000.0
        );

        for stage in &instance.stages {
            if !stage.success {
                println!(
                    "      {} {} exit code {}",
                    style("✗").red(),
                    stage.label,
                    stage.exit_code
                );
            }
        }
    }

    if report.success() {
        println!("\n{} Run {} passed", style("✓").green().bold(), report.id);
        return Ok(());
    }

    println!("\n{} Run {} failed", style("✗").red().bold(), report.id);
    let failed = report
        .instances
        .iter()
        .flat_map(|i| i.stages.iter())
        .find(|s| !s.success);
    match failed {
        Some(stage) => Err(Box::new(crucible_core::Error::StageFailed {
            stage: stage.label.clone(),
            exit_code: stage.exit_code,
        })),
        None => Err("one or more instances failed".into()),
    }
}

/// Show current configuration.
pub fn show_config(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("workspace: {}", config.workspace);
    println!("source_dir: {}", config.source_dir);
    println!("toolchain_command: {}", config.toolchain_command);
    println!("hardware_var: {}", config.hardware_var);
    Ok(())
}

/// Set a configuration value.
pub fn set_config(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::load().unwrap_or_default();
    config.set(key, value)?;
    config.save()?;
    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}
