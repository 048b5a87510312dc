//! # CLI Commands
//!
//! One `cmd_*` function per subcommand. Each prints its result to stdout
//! (plain text or JSON) and also returns it so callers and tests can inspect it.
//!
//! Profiles are only ever read. Nothing here writes back to disk.

use guardian_core::{
    next_size, remaining_schedule, Decision, GuardianError, GuardianProfile, PyramidingConfig,
    Result, Trigger,
};
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};

/// Name used for triggers evaluated ad hoc from the command line.
pub const ADHOC_TRIGGER_NAME: &str = "adhoc";

// =============================================================================
// PROFILE LOADING
// =============================================================================

/// Read and validate a profile file.
pub fn load_profile(path: &Path) -> Result<GuardianProfile> {
    debug!(path = %path.display(), "loading profile");

    let content = std::fs::read_to_string(path)
        .map_err(|e| GuardianError::Io(format!("{}: {}", path.display(), e)))?;
    let profile = GuardianProfile::from_json(&content)?;

    debug!(
        toggles = profile.toggles.len(),
        triggers = profile.triggers.len(),
        "profile loaded"
    );
    Ok(profile)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| GuardianError::Serialize(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn report_decision(
    trigger: &Trigger,
    value: f64,
    decision: Decision,
    json_mode: bool,
) -> Result<()> {
    info!(
        trigger = trigger.name(),
        value,
        threshold = trigger.threshold(),
        %decision,
        "trigger evaluated"
    );

    if json_mode {
        print_json(&json!({
            "trigger": trigger.name(),
            "value": value,
            "threshold": trigger.threshold(),
            "decision": decision,
        }))
    } else {
        println!(
            "{}: {} (value {} vs threshold {})",
            trigger.name(),
            decision,
            value,
            trigger.threshold()
        );
        Ok(())
    }
}

// =============================================================================
// EVAL COMMAND
// =============================================================================

/// Evaluate a reading against a threshold given on the command line.
pub fn cmd_eval(
    name: Option<&str>,
    value: f64,
    threshold: f64,
    json_mode: bool,
) -> Result<Decision> {
    let trigger = Trigger::try_new(name.unwrap_or(ADHOC_TRIGGER_NAME), threshold)?;
    let decision = trigger.evaluate(value);
    report_decision(&trigger, value, decision, json_mode)?;
    Ok(decision)
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Evaluate a reading against a named trigger from a profile.
pub fn cmd_check(
    profile_path: &Path,
    trigger_name: &str,
    value: f64,
    json_mode: bool,
) -> Result<Decision> {
    let profile = load_profile(profile_path)?;
    let trigger = profile.require_trigger(trigger_name)?;
    let decision = trigger.evaluate(value);
    report_decision(trigger, value, decision, json_mode)?;
    Ok(decision)
}

// =============================================================================
// TOGGLE COMMAND
// =============================================================================

/// Report whether a toggle is enabled in a profile. Unknown names are off.
pub fn cmd_toggle(profile_path: &Path, name: &str, json_mode: bool) -> Result<bool> {
    let toggles = load_profile(profile_path)?.toggle_store();
    let enabled = toggles.is_enabled(name);
    let explicit = toggles.contains(name);

    debug!(toggle = name, enabled, explicit, "toggle looked up");

    if json_mode {
        print_json(&json!({
            "toggle": name,
            "enabled": enabled,
            "explicit": explicit,
        }))?;
    } else {
        let state = if enabled { "enabled" } else { "disabled" };
        let source = if explicit { "" } else { " (default)" };
        println!("{name}: {state}{source}");
    }

    Ok(enabled)
}

// =============================================================================
// SIZE COMMAND
// =============================================================================

/// Compute the next pyramid layer size.
///
/// Settings come from the profile when given, otherwise the defaults.
/// `max_layers` and `aggressive` override whichever was loaded.
pub fn cmd_size(
    profile_path: Option<&Path>,
    current_layers: u32,
    base_size: u64,
    max_layers: Option<u32>,
    aggressive: bool,
    json_mode: bool,
) -> Result<u64> {
    let mut config = match profile_path {
        Some(path) => load_profile(path)?.pyramiding,
        None => PyramidingConfig::default(),
    };
    if let Some(max) = max_layers {
        config.max_layers = max;
    }
    if aggressive {
        config.risk_neutral = false;
    }

    let size = next_size(current_layers, base_size, &config);
    let schedule = remaining_schedule(current_layers, base_size, &config);

    info!(
        current_layers,
        base_size,
        max_layers = config.max_layers,
        risk_neutral = config.risk_neutral,
        size,
        "next layer sized"
    );

    if json_mode {
        print_json(&json!({
            "current_layers": current_layers,
            "base_size": base_size,
            "max_layers": config.max_layers,
            "risk_neutral": config.risk_neutral,
            "next_size": size,
            "remaining": schedule,
        }))?;
    } else {
        print!("{}", size_report(current_layers, &config, size, &schedule));
    }

    Ok(size)
}

/// Plain-text summary printed by `cmd_size`.
pub fn size_report(
    current_layers: u32,
    config: &PyramidingConfig,
    size: u64,
    schedule: &[u64],
) -> String {
    if !config.has_capacity(current_layers) {
        return format!(
            "No capacity: {} of {} layers already in place\n",
            current_layers, config.max_layers
        );
    }

    let mode = if config.risk_neutral {
        "risk-neutral"
    } else {
        "aggressive"
    };
    let rest = schedule
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Next layer: {size} ({mode}, layer {} of {})\nRemaining schedule: {rest}\n",
        current_layers.saturating_add(1),
        config.max_layers
    )
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Summarise a profile.
pub fn cmd_status(profile_path: &Path, json_mode: bool) -> Result<GuardianProfile> {
    let profile = load_profile(profile_path)?;

    if json_mode {
        println!("{}", profile.to_json_pretty()?);
        return Ok(profile);
    }

    println!("Guardian profile: {}", profile_path.display());
    println!();
    println!("Toggles ({}):", profile.toggles.len());
    if profile.toggles.is_empty() {
        println!("  (none, every toggle is disabled)");
    }
    for (name, enabled) in profile.toggles.iter() {
        println!("  {:<32} {}", name, if enabled { "on" } else { "off" });
    }

    println!("Triggers ({}):", profile.triggers.len());
    if profile.triggers.is_empty() {
        println!("  (none)");
    }
    for trigger in &profile.triggers {
        println!("  {:<32} >= {}", trigger.name(), trigger.threshold());
    }

    println!(
        "Pyramiding: max {} layers, {}",
        profile.pyramiding.max_layers,
        if profile.pyramiding.risk_neutral {
            "risk-neutral"
        } else {
            "aggressive"
        }
    );

    Ok(profile)
}
