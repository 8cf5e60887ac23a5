use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use device_registry::DeviceRegistry;
use motor_controller as mc;
use motor_controller::mock::{DriverCall, RecordingBinder};

#[derive(Parser, Debug)]
#[command(
    name = "mc",
    version,
    about = "Motor controller configuration tool",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate controller descriptors
    Validate {
        /// YAML descriptor file path
        #[arg(long)]
        file: Option<String>,
        /// Directory of YAML descriptors
        #[arg(long)]
        dir: Option<String>,
        /// Print the parsed descriptors as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// List controllers described in a directory
    List {
        #[arg(long, default_value = "configs/controllers")]
        dir: String,
    },
    /// Build controllers and push their startup config to a recording backend
    Apply {
        /// YAML descriptor file path
        #[arg(long)]
        file: Option<String>,
        /// Directory of YAML descriptors
        #[arg(long)]
        dir: Option<String>,
        /// Bind every controller to the inert test stub
        #[arg(long, action = ArgAction::SetTrue)]
        test_mode: bool,
        /// Print Prometheus metrics after applying
        #[arg(long, action = ArgAction::SetTrue)]
        metrics: bool,
        /// Print the result as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file, dir, json } => {
            controller_validate(file.as_deref(), dir.as_deref(), json)
        }
        Commands::List { dir } => controller_list(&dir),
        Commands::Apply {
            file,
            dir,
            test_mode,
            metrics,
            json,
        } => controller_apply(file.as_deref(), dir.as_deref(), test_mode, metrics, json),
    }
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_selection(file: Option<&str>, dir: Option<&str>) -> Result<mc::ControllerSet> {
    match (file, dir) {
        (Some(f), None) => {
            let mut set = mc::ControllerSet::default();
            set.insert(mc::load_descriptor_file(f)?);
            Ok(set)
        }
        (None, Some(d)) => mc::load_descriptors_dir(d),
        _ => Err(anyhow::anyhow!("provide --file <path> or --dir <dir>")),
    }
}

fn controller_validate(file: Option<&str>, dir: Option<&str>, json: bool) -> Result<()> {
    let set = load_selection(file, dir)?;
    let dups = set.duplicate_ids();
    if !dups.is_empty() {
        let list: Vec<String> = dups.iter().map(ToString::to_string).collect();
        return Err(anyhow::anyhow!(
            "device ids claimed more than once: {}",
            list.join(", ")
        ));
    }
    println!("ok: loaded {} controllers", set.controllers.len());
    if json {
        println!("{}", serde_json::to_string_pretty(&set.sorted())?);
    }
    Ok(())
}

fn controller_list(dir: &str) -> Result<()> {
    let set = mc::load_descriptors_dir(dir)?;
    for d in set.sorted() {
        println!(
            "{}\tid={}\tenabled={}\tneutral={:?}",
            d.name,
            d.device_id(),
            d.enabled,
            d.neutral_mode
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct AppliedController {
    name: String,
    id: i32,
    backing: mc::BackingKind,
    failed_gain_writes: usize,
    calls: Vec<String>,
}

fn controller_apply(
    file: Option<&str>,
    dir: Option<&str>,
    test_mode: bool,
    metrics: bool,
    json: bool,
) -> Result<()> {
    let set = load_selection(file, dir)?;
    let binder = Arc::new(RecordingBinder::new());
    let hub = mc::MetricsHub::new().map_err(|e| anyhow::anyhow!(e))?;
    let factory = mc::ControllerFactory::new()
        .test_mode(test_mode)
        .with_registry(Arc::new(DeviceRegistry::new()))
        .with_binder(binder.clone())
        .with_metrics(hub.clone());

    let mut applied = Vec::new();
    for desc in set.sorted() {
        let config = desc.to_config()?;
        let handle = factory.build(desc.device_id(), &config)?;
        let failed: usize = handle
            .startup_report()
            .iter()
            .map(|r| r.failures().count())
            .sum();
        if failed > 0 {
            warn!(controller = %desc.name, failed, "gain writes reported errors");
        }
        let calls = if handle.backing_kind() == mc::BackingKind::Hardware {
            binder
                .state(handle.id())
                .lock()
                .calls
                .iter()
                .map(describe_call)
                .collect()
        } else {
            Vec::new()
        };
        applied.push(AppliedController {
            name: desc.name.clone(),
            id: handle.id().raw(),
            backing: handle.backing_kind(),
            failed_gain_writes: failed,
            calls,
        });
    }
    info!(n = applied.len(), test_mode, "applied controller configs");

    if json {
        println!("{}", serde_json::to_string_pretty(&applied)?);
    } else {
        for a in &applied {
            println!("{}\tid={}\tbacking={}", a.name, a.id, a.backing);
            for c in &a.calls {
                println!("  {c}");
            }
        }
    }
    if metrics {
        print!("{}", hub.encode_text());
    }
    Ok(())
}

fn describe_call(call: &DriverCall) -> String {
    match call {
        DriverCall::Set { mode, value } => format!("set {mode:?} {value}"),
        DriverCall::SetSensorPosition {
            value,
            pid_idx,
            timeout_ms,
        } => format!("set_sensor_position {value} pid={pid_idx} timeout={timeout_ms}ms"),
        DriverCall::SetNeutralMode(mode) => format!("set_neutral_mode {mode:?}"),
        DriverCall::SetInverted(invert) => format!("set_inverted {invert:?}"),
        DriverCall::ConfigGain {
            slot, kind, value, ..
        } => format!("config_{} {slot} {value}", kind.as_str()),
    }
}
