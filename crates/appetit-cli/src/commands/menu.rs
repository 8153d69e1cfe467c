//! Menu browsing commands.

use anyhow::Result;
use appetit_client::MenuApiClient;
use appetit_core::config::ClientConfig;
use chrono::{Local, NaiveDate};
use colored::Colorize;

pub async fn locations(config: &ClientConfig) -> Result<()> {
    let client = MenuApiClient::new(config)?;
    let locations = client.locations().await?;

    for location in locations.iter().filter(|l| l.displayed) {
        println!("{} ({})", location.name.bold(), location.slug);
        for menu_type in location.menu_types.iter().filter(|m| m.displayed) {
            println!("  - {} ({})", menu_type.name, menu_type.slug);
        }
    }
    Ok(())
}

pub async fn daily(
    config: &ClientConfig,
    location: &str,
    menu_type: &str,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let client = MenuApiClient::new(config)?;

    let Some(menu) = client.daily_menu(location, menu_type, date).await? else {
        println!("No menu for {} {} on {}", location, menu_type, date);
        return Ok(());
    };

    println!("{}", format!("{} - {}", menu.date, menu_type).bold());
    for section in &menu.sections {
        println!("\n{}", section.name.underline());
        for entry in &section.menu_items {
            let item = &entry.menu_item;
            println!(
                "  {} ({} {})",
                item.name, item.serving_size.amount, item.serving_size.unit
            );
        }
    }
    Ok(())
}

pub async fn month(
    config: &ClientConfig,
    location: &str,
    menu_type: &str,
    year: i32,
    month: u32,
) -> Result<()> {
    let client = MenuApiClient::new(config)?;
    let days = client.monthly_view(location, menu_type, year, month).await?;

    for day in &days {
        let marker = if day.has_menu_items {
            "menu available".green()
        } else {
            "no menu".dimmed()
        };
        println!("{}  {}", day.day, marker);
    }
    Ok(())
}
