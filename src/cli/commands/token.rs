use anyhow::Context;
use serde_json::json;

use crate::auth::generate_jwt;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(subject: &str, hours: Option<u64>, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let token = generate_jwt(&config.security, subject, hours).context("failed to sign token")?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "subject": subject,
                "expires_in_hours": hours.unwrap_or(config.security.jwt_expiry_hours),
                "token": token
            })
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
