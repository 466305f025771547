//! `numina init`: First-time setup.

use numina_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("💬 Numina — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Add your assistant credentials to {}", config_path.display());
        println!("      (or set WATSON_SERVICE_URL, WATSON_ASSISTANT_ID,");
        println!("       WATSON_ENVIRONMENT_ID and WATSON_API_KEY)");
        println!("   2. Run: numina chat");
        println!("   3. Or serve the API: numina serve\n");
    }

    println!("🎉 Setup complete!\n");

    Ok(())
}
