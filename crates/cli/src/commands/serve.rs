//! `numina serve`: Start the HTTP API server.

use numina_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("💬 Numina Gateway");
    println!("   Listening:  {}:{}", config.gateway.host, config.gateway.port);
    println!("   Free text:  {}", config.chatbot.free_text);
    println!("   CORS:       {}", config.gateway.allowed_origin);

    numina_gateway::start(config).await?;

    Ok(())
}
