//! `numina status`: Show effective configuration.

use numina_config::AppConfig;
use numina_finance::{DemoFinances, FinanceRepository, total_balance};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let assistant = &config.assistant;

    println!("💬 Numina Status");
    println!("================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Preferences:    {}", config.preferences_path().display());
    println!("  Gateway:        {}:{}", config.gateway.host, config.gateway.port);
    println!("  CORS origin:    {}", config.gateway.allowed_origin);
    println!("  Rate limit:     {}/min", config.gateway.rate_limit_per_minute);
    println!("  Free text:      {}", config.chatbot.free_text);
    println!(
        "  Typing delay:   {}–{} ms",
        config.chatbot.typing_delay_min_ms, config.chatbot.typing_delay_max_ms
    );
    println!("  History:        {}", config.chatbot.history_window);
    println!(
        "  Assistant:      {}",
        assistant.service_url.as_deref().unwrap_or("(not set)")
    );
    println!("  API version:    {}", assistant.api_version);
    println!(
        "  API key:        {}",
        if assistant.api_key.is_some() { "set" } else { "not set" }
    );

    let accounts = DemoFinances.accounts();
    println!(
        "  Demo accounts:  {} (${:.2})",
        accounts.len(),
        total_balance(&accounts)
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `numina init` first");
    }

    Ok(())
}
