use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use gart_net::{Conditional, Headers, Net, NetError, NetExt};
use url::Url;

/// Synthetic delayed responder that tracks how many requests are in flight
/// at once.
#[derive(Clone, Default)]
struct Gauge {
    in_flight: Arc<AtomicUsize>,
    high_water: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl Gauge {
    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Net for Gauge {
    async fn get_bytes(&self, _url: Url) -> Result<Bytes, NetError> {
        self.enter().await;
        Ok(Bytes::from_static(b"ok"))
    }

    async fn get_conditional(
        &self,
        _url: Url,
        _validator: Option<&str>,
    ) -> Result<Conditional, NetError> {
        self.enter().await;
        Ok(Conditional::NotModified)
    }

    async fn head(&self, _url: Url) -> Result<Headers, NetError> {
        self.enter().await;
        Ok(Headers::new())
    }
}

fn test_url(i: usize) -> Url {
    Url::parse(&format!("https://example.com/sites/default/files/f{i}")).unwrap()
}

#[tokio::test]
async fn admission_never_exceeds_ceiling() {
    const CEILING: usize = 3;

    let gauge = Gauge::default();
    let bounded = gauge.clone().with_limit(CEILING);

    let mut tasks = Vec::new();
    for i in 0..20 {
        let net = bounded.clone();
        tasks.push(tokio::spawn(async move {
            net.get_bytes(test_url(i)).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(gauge.total.load(Ordering::SeqCst), 20);
    assert!(
        gauge.high_water.load(Ordering::SeqCst) <= CEILING,
        "observed {} concurrent requests, ceiling is {CEILING}",
        gauge.high_water.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn mixed_operations_share_one_budget() {
    const CEILING: usize = 2;

    let gauge = Gauge::default();
    let bounded = gauge.clone().with_limit(CEILING);

    // GETs, HEADs, and conditional GETs all drawing from the same pool.
    let mut tasks = Vec::new();
    for i in 0..12 {
        let net = bounded.clone();
        tasks.push(tokio::spawn(async move {
            match i % 3 {
                0 => {
                    net.get_bytes(test_url(i)).await.unwrap();
                }
                1 => {
                    net.head(test_url(i)).await.unwrap();
                }
                _ => {
                    net.get_conditional(test_url(i), Some("tag")).await.unwrap();
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert!(gauge.high_water.load(Ordering::SeqCst) <= CEILING);
}

#[tokio::test]
async fn slots_are_released_after_completion() {
    let bounded = Gauge::default().with_limit(4);

    for i in 0..4 {
        bounded.get_bytes(test_url(i)).await.unwrap();
    }
    assert_eq!(bounded.available_slots(), 4);
}

#[tokio::test]
async fn slot_released_when_caller_is_dropped() {
    let gauge = Gauge::default();
    let bounded = gauge.clone().with_limit(1);

    // Occupy the only slot, then abort a waiter before it is admitted.
    let hold = {
        let net = bounded.clone();
        tokio::spawn(async move { net.get_bytes(test_url(0)).await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;

    let waiter = {
        let net = bounded.clone();
        tokio::spawn(async move { net.get_bytes(test_url(1)).await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    waiter.abort();
    let _ = waiter.await;

    hold.await.unwrap().unwrap();

    // The aborted waiter must not have leaked its place in the queue.
    bounded.get_bytes(test_url(2)).await.unwrap();
    assert_eq!(bounded.available_slots(), 1);
    assert_eq!(gauge.total.load(Ordering::SeqCst), 2);
}
