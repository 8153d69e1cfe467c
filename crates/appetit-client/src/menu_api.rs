//! Menu browsing endpoints.
//!
//! Plain request/response calls; no state is kept between them beyond the
//! connection pool inside the reqwest client.

use appetit_core::config::ClientConfig;
use appetit_core::error::{AppetitError, Result};
use appetit_core::menu::{DatedMenuItem, FoodProperty, Location, Menu, MonthlyViewDay};
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Client for the read-only menu endpoints.
#[derive(Clone)]
pub struct MenuApiClient {
    client: Client,
    base_url: String,
}

impl MenuApiClient {
    /// Creates a client from connection settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// All dining locations, with the menu types each one serves.
    pub async fn locations(&self) -> Result<Vec<Location>> {
        self.get_json(&format!("{}/menu/locations", self.base_url))
            .await
    }

    /// The dietary properties dishes can be tagged with.
    pub async fn food_properties(&self) -> Result<Vec<FoodProperty>> {
        self.get_json(&format!("{}/menu/food-properties", self.base_url))
            .await
    }

    /// The menu for one location, menu type, and date. `None` when the
    /// server has no menu for that day.
    pub async fn daily_menu(
        &self,
        location_slug: &str,
        menu_type_slug: &str,
        date: NaiveDate,
    ) -> Result<Option<Menu>> {
        let url = format!(
            "{}/menu/daily-menu/{}/{}/{}/{}/{}",
            self.base_url,
            location_slug,
            menu_type_slug,
            date.year(),
            date.month(),
            date.day()
        );
        self.get_json(&url).await
    }

    /// Which days of a month have any menu, for the calendar view.
    pub async fn monthly_view(
        &self,
        location_slug: &str,
        menu_type_slug: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<MonthlyViewDay>> {
        let url = format!(
            "{}/menu/monthly-view/{}/{}/{}/{}",
            self.base_url, location_slug, menu_type_slug, year, month
        );
        self.get_json(&url).await
    }

    /// The newest known revision of a dish, by content hash.
    pub async fn latest_item_version(&self, hash: &str) -> Result<Option<DatedMenuItem>> {
        let url = format!("{}/menu/latest-item-version/{}", self.base_url, hash);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AppetitError::http(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}
