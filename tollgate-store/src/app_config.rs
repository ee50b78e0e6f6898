use serde::Deserialize;
use std::env;
use tollgate_booking::CancellationPolicy;
use tollgate_core::CurrencyCode;
use tollgate_order::{LocationType, ShippingRateTable, ShippingStrategy};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub shipping: ShippingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_lead_days")]
    pub shipping_lead_days: u32,
    #[serde(default = "default_gold_notice_hours")]
    pub gold_notice_hours: i64,
    #[serde(default = "default_regular_notice_hours")]
    pub regular_notice_hours: i64,
    #[serde(default)]
    pub currency: CurrencyCode,
}

fn default_lead_days() -> u32 { 1 }
fn default_gold_notice_hours() -> i64 { 24 }
fn default_regular_notice_hours() -> i64 { 48 }

/// Notice windows longer than a year are treated as misconfiguration
const MAX_NOTICE_HOURS: i64 = 24 * 366;

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            shipping_lead_days: default_lead_days(),
            gold_notice_hours: default_gold_notice_hours(),
            regular_notice_hours: default_regular_notice_hours(),
            currency: CurrencyCode::default(),
        }
    }
}

impl BusinessRules {
    pub fn cancellation_policy(&self) -> CancellationPolicy {
        CancellationPolicy::from_hours(self.gold_notice_hours, self.regular_notice_hours)
    }
}

/// Shipping strategy per destination type; unset locations cannot be priced
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ShippingConfig {
    pub domestic: Option<ShippingStrategy>,
    pub international: Option<ShippingStrategy>,
    pub remote: Option<ShippingStrategy>,
}

impl ShippingConfig {
    pub fn rate_table(&self) -> ShippingRateTable {
        [
            (LocationType::Domestic, &self.domestic),
            (LocationType::International, &self.international),
            (LocationType::Remote, &self.remote),
        ]
        .into_iter()
        .filter_map(|(location, strategy)| strategy.clone().map(|s| (location, s)))
        .fold(ShippingRateTable::new(), |table, (location, strategy)| {
            table.with_rate(location, strategy)
        })
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `TOLLGATE__BUSINESS_RULES__GOLD_NOTICE_HOURS=12`
            .add_source(config::Environment::with_prefix("TOLLGATE").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let rules = &self.business_rules;
        for hours in [rules.gold_notice_hours, rules.regular_notice_hours] {
            if !(0..=MAX_NOTICE_HOURS).contains(&hours) {
                return Err(config::ConfigError::Message(format!(
                    "notice hours must be between 0 and {}, got {}",
                    MAX_NOTICE_HOURS, hours
                )));
            }
        }
        if self.shipping.rate_table().is_empty() {
            return Err(config::ConfigError::Message(
                "at least one shipping rate must be configured".to_string(),
            ));
        }
        Ok(())
    }
}
