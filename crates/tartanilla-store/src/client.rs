//! The schedule store seam and its REST implementation.

use std::time::Duration;

use reqwest::Client;
use tartanilla_schedule::grid::MonthWindow;
use tartanilla_schedule::record::{date_key, AvailabilityRecord, BookingRecord};
use tartanilla_schedule::slot::SlotCatalog;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::retry::RetryPolicy;
use crate::wire::{self, SetAvailabilityRequest};

/// Persistence and transport for bookings and availability.
///
/// Reads cover one month window. Bookings are created elsewhere; this seam
/// only reads them.
#[allow(async_fn_in_trait)]
pub trait ScheduleStore {
    async fn bookings(&self, driver_id: &str, window: MonthWindow) -> Result<Vec<BookingRecord>>;

    async fn availability(
        &self,
        driver_id: &str,
        window: MonthWindow,
    ) -> Result<Vec<AvailabilityRecord>>;

    async fn set_availability(&self, request: &SetAvailabilityRequest) -> Result<()>;
}

impl<S: ScheduleStore + ?Sized> ScheduleStore for &S {
    async fn bookings(&self, driver_id: &str, window: MonthWindow) -> Result<Vec<BookingRecord>> {
        (**self).bookings(driver_id, window).await
    }

    async fn availability(
        &self,
        driver_id: &str,
        window: MonthWindow,
    ) -> Result<Vec<AvailabilityRecord>> {
        (**self).availability(driver_id, window).await
    }

    async fn set_availability(&self, request: &SetAvailabilityRequest) -> Result<()> {
        (**self).set_availability(request).await
    }
}

/// `ScheduleStore` over the driver-schedule REST API.
pub struct HttpScheduleStore {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    catalog: SlotCatalog,
}

impl HttpScheduleStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tartanilla/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            policy: config.retry_policy(),
            catalog: config.catalog.catalog(),
        })
    }

    /// Override the timeouts taken from the config.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> SlotCatalog {
        self.catalog
    }

    fn url(&self, path: &str) -> String {
        format!("{}/driver-schedule/{}", self.base_url, path)
    }

    fn window_query(window: MonthWindow) -> [(&'static str, String); 2] {
        [
            ("date_from", date_key(window.first())),
            ("date_to", date_key(window.last())),
        ]
    }

    async fn get_once(
        &self,
        url: &str,
        query: &[(&'static str, String)],
        timeout: Duration,
    ) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;
        read_body(response).await
    }

    async fn get_with_retry(&self, what: &str, url: String, window: MonthWindow) -> Result<String> {
        let query = Self::window_query(window);
        log::debug!("GET {} {:?}", url, query);
        self.policy
            .run(what, |timeout| self.get_once(&url, &query, timeout))
            .await
    }

    async fn post_once(
        &self,
        url: &str,
        request: &SetAvailabilityRequest,
        timeout: Duration,
    ) -> Result<String> {
        let response = self
            .client
            .post(url)
            .json(request)
            .timeout(timeout)
            .send()
            .await?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(StoreError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

impl ScheduleStore for HttpScheduleStore {
    async fn bookings(&self, driver_id: &str, window: MonthWindow) -> Result<Vec<BookingRecord>> {
        let url = self.url(&format!("calendar/{}/", driver_id));
        let body = self.get_with_retry("bookings fetch", url, window).await?;
        wire::decode_bookings(&body)
    }

    async fn availability(
        &self,
        driver_id: &str,
        window: MonthWindow,
    ) -> Result<Vec<AvailabilityRecord>> {
        let url = self.url(&format!("schedule/{}/", driver_id));
        let body = self.get_with_retry("availability fetch", url, window).await?;
        wire::decode_availability(&body, &self.catalog, driver_id)
    }

    async fn set_availability(&self, request: &SetAvailabilityRequest) -> Result<()> {
        let url = self.url("set-availability/");
        log::debug!("POST {} for {}", url, request.date);
        let body = self
            .policy
            .run("set availability", |timeout| {
                self.post_once(&url, request, timeout)
            })
            .await?;
        wire::check_write_response(&body)
    }
}
