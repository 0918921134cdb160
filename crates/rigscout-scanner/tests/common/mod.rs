//! Hand-written fakes shared by the scanner integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use rigscout_assess::{Valuation, ValuationError};
use rigscout_core::Listing;
use rigscout_extract::{DocumentSource, FetchError, ParsedDocument};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned page with an artificial delay and a number of leading failures.
#[derive(Clone)]
pub struct Page {
    pub html: String,
    pub delay: Duration,
    pub failures: usize,
}

impl Page {
    pub fn new(html: String) -> Self {
        Self {
            html,
            delay: Duration::ZERO,
            failures: 0,
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }
}

/// Serves [`Page`]s keyed by URL and tracks concurrent fetches.
#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<String, Page>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    total_calls: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn fetch_and_parse(&self, url: &str) -> Result<ParsedDocument, FetchError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let Some(page) = self.pages.get(url) else {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: 404,
            });
        };

        let call = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        tokio::time::sleep(page.delay).await;
        if call <= page.failures {
            return Err(FetchError::Network("connection reset".to_string()));
        }
        Ok(ParsedDocument::new(url, page.html.clone()))
    }
}

/// Returns a fixed fair market value per listing URL.
#[derive(Default)]
pub struct FakeValuation {
    values: HashMap<String, f64>,
    panic_on: Option<String>,
}

impl FakeValuation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, url: &str, fmv: f64) -> Self {
        self.values.insert(url.to_string(), fmv);
        self
    }

    pub fn panic_on(mut self, url: &str) -> Self {
        self.panic_on = Some(url.to_string());
        self
    }
}

#[async_trait]
impl Valuation for FakeValuation {
    async fn estimate_fmv(&self, listing: &Listing) -> Result<f64, ValuationError> {
        if self.panic_on.as_deref() == Some(listing.url.as_str()) {
            panic!("valuation backend crashed");
        }
        self.values
            .get(&listing.url)
            .copied()
            .ok_or_else(|| ValuationError::NoData(format!("no value for {}", listing.url)))
    }
}

pub fn listing_url(n: usize) -> String {
    format!("https://offerup.com/item/detail/{n}")
}

/// OfferUp item page with four photos.
pub fn offerup_page(title: &str, price: f64) -> String {
    format!(
        r#"<html><body>
        <h1>{title}</h1>
        <p data-testid="item-price">${price:.0}</p>
        <div data-testid="item-description">Ryzen 5 5600X, RTX 3060 12GB, 16GB DDR4, 1TB NVMe. Local pickup.</div>
        <span data-testid="item-location">Austin, TX</span>
        <div data-testid="item-image"><img src="https://images.offerup.com/1.jpg"></div>
        <div data-testid="item-image"><img src="https://images.offerup.com/2.jpg"></div>
        <div data-testid="item-image"><img src="https://images.offerup.com/3.jpg"></div>
        <div data-testid="item-image"><img src="https://images.offerup.com/4.jpg"></div>
        </body></html>"#
    )
}

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
