//! `numina doctor`: Diagnose configuration and credentials.

use numina_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Numina Doctor — Diagnostics");
    println!("==============================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `numina init` (defaults in use)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  Fix the configuration and re-run doctor.");
            return Ok(());
        }
    };

    let missing = config.assistant.missing_fields();
    if missing.is_empty() {
        println!("  ✅ Assistant credentials configured");
    } else {
        println!("  ❌ Assistant settings missing: {}", missing.join(", "));
        issues += 1;
        if config.chatbot.uses_remote_free_text() {
            println!("     Typed messages will show a connection warning.");
            println!("     Set chatbot.free_text = \"local\" to answer them offline.");
        }
    }

    match numina_providers::build_from_config(&config) {
        Ok(gateway) => match gateway.health_check().await {
            Ok(_) => println!("  ✅ Assistant gateway ready ({})", gateway.name()),
            Err(e) => {
                println!("  ⚠️  Assistant gateway not ready: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Could not build assistant gateway: {e}");
            issues += 1;
        }
    }

    let prefs_path = config.preferences_path();
    if prefs_path.exists() {
        println!("  ✅ Preferences file: {}", prefs_path.display());
    } else {
        println!("  ℹ️  No preferences saved yet (defaults in use)");
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
