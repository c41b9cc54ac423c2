use std::io::{self, Write};

use crate::client::DEFAULT_ENDPOINT;
use crate::config::Config;
use crate::error::{BrowseError, Result};

fn ask(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn render_config(endpoint: &str, timeout: &str) -> String {
    let mut content = String::new();
    if !endpoint.is_empty() {
        content.push_str(&format!("endpoint = \"{endpoint}\"\n"));
    }
    if !timeout.is_empty() {
        content.push_str(&format!("timeout_secs = {timeout}\n"));
    }
    content
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = ask(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Character Browser Configuration");
    println!("===============================\n");

    let endpoint = ask(&format!("Collection endpoint [{DEFAULT_ENDPOINT}]: "))?;
    if !endpoint.is_empty() {
        url::Url::parse(&endpoint)
            .map_err(|e| BrowseError::InvalidUrl(format!("{endpoint}: {e}")))?;
    }

    let timeout = ask("Request timeout in seconds [30]: ")?;
    if !timeout.is_empty() && timeout.parse::<u64>().is_err() {
        return Err(BrowseError::InvalidTimeout(timeout));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BrowseError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, render_config(&endpoint, &timeout)).map_err(|e| {
        BrowseError::ConfigRead {
            path: config_path.clone(),
            source: e,
        }
    })?;

    println!("\nConfig saved to {}", config_path.display());

    Ok(())
}
