use std::sync::Arc;

use anyhow::Context;
use cancha_catalog::{FilterEngine, PriceBrackets};
use cancha_core::Facility;
use cancha_order::{BookingOrchestrator, CancellationPolicy, CancellationPolicyEvaluator};
use cancha_store::app_config::Config;
use cancha_store::seed::{self, SeedListing};
use cancha_store::{InMemoryFacilityRepository, InMemorySlotRepository, RedisClient, RedisSlotLock};
use chrono::{Duration, Utc};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<BookingOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: BookingOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// In-memory state with default business rules
    pub fn in_memory(facilities: Vec<Facility>, listings: Vec<SeedListing>) -> Self {
        Self::new(BookingOrchestrator::new(
            Arc::new(InMemoryFacilityRepository::new(facilities)),
            Arc::new(InMemorySlotRepository::with_slots(listings)),
            CancellationPolicyEvaluator::default(),
        ))
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let rules = &config.business_rules;

        let (facilities, listings) = match &config.catalog.seed_path {
            Some(path) => {
                let data = seed::load_seed(path).with_context(|| format!("loading seed file {}", path))?;
                tracing::info!("Loaded {} facilities from {}", data.facilities.len(), path);
                (data.facilities, data.listings)
            }
            None => {
                let today = Utc::now().date_naive();
                let listings = (0..config.catalog.demo_days)
                    .flat_map(|offset| seed::demo_slots(today + Duration::days(offset.into())))
                    .collect();
                (seed::demo_facilities(), listings)
            }
        };

        let policy = CancellationPolicy::new(rules.full_refund_notice_hours, rules.partial_refund_notice_hours)?;
        let brackets = PriceBrackets {
            low_below: rules.low_price_below,
            high_above: rules.high_price_above,
        };

        let mut orchestrator = BookingOrchestrator::new(
            Arc::new(InMemoryFacilityRepository::new(facilities)),
            Arc::new(InMemorySlotRepository::with_slots(listings)),
            CancellationPolicyEvaluator::new(policy),
        )
        .with_filter_engine(FilterEngine::new(brackets));

        if let Some(redis) = &config.redis {
            let client = RedisClient::new(&redis.url).context("opening Redis client")?;
            orchestrator = orchestrator.with_slot_lock(Arc::new(RedisSlotLock::new(client, rules.slot_lock_seconds)));
            tracing::info!("Distributed slot lock enabled");
        }

        Ok(Self::new(orchestrator))
    }
}
