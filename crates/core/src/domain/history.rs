use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stock on hand keyed by drink name.
pub type Inventory = HashMap<String, u32>;
/// Unit production cost keyed by drink name.
pub type CostTable = HashMap<String, f64>;
/// Partner brand priority keyed by brand name. Ordered so brand lookup is deterministic.
pub type BrandPriorities = BTreeMap<String, f64>;
/// Average customer rating keyed by drink name.
pub type FeedbackHistory = HashMap<String, f64>;
/// Drink names the customer recently turned down.
pub type RejectionHistory = HashSet<String>;

pub const ALCOHOL_UNITS_FIELD: &str = "alcohol_units";

/// One recent order line. Only the `alcohol_units` field is read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumptionRecord(pub Map<String, Value>);

impl ConsumptionRecord {
    pub fn with_alcohol_units(units: f64) -> Self {
        let mut fields = Map::new();
        fields.insert(ALCOHOL_UNITS_FIELD.to_owned(), Value::from(units));
        Self(fields)
    }

    /// Missing, non-numeric or non-finite values count as zero.
    pub fn alcohol_units(&self) -> f64 {
        self.0
            .get(ALCOHOL_UNITS_FIELD)
            .and_then(Value::as_f64)
            .filter(|units| units.is_finite())
            .unwrap_or(0.0)
    }
}

pub fn recent_alcohol_units(history: &[ConsumptionRecord]) -> f64 {
    history.iter().map(ConsumptionRecord::alcohol_units).sum()
}
