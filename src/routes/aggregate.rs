use crate::parser::ParsedFlight;
use crate::routes::normalize::{normalize, round_to};
use crate::routes::types::{ColumnKey, Metric, Number, RouteKey};
use std::collections::BTreeMap;

/// Decimal places kept for `delayRatio`.
const RATIO_PLACES: usize = 2;

/// The three metric columns of one route. All columns have the same length,
/// one entry per flight in input order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RouteColumns {
    departed_on: Vec<Number>,
    delay_in_minutes: Vec<Number>,
    delay_ratio: Vec<Number>,
}

impl RouteColumns {
    pub fn column(&self, metric: Metric) -> &[Number] {
        match metric {
            Metric::DepartedOn => &self.departed_on,
            Metric::DelayInMinutes => &self.delay_in_minutes,
            Metric::DelayRatio => &self.delay_ratio,
        }
    }

    /// Number of flights. Only [`RouteAggregator::add`] writes the columns
    /// and it pushes to all three, so any column gives the length.
    pub fn len(&self) -> usize {
        self.departed_on.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departed_on.is_empty()
    }
}

/// Accumulates parsed flights into per-route columns.
///
/// Routes are kept in a [`BTreeMap`], so iteration (and therefore the
/// written output) is ordered by origin then destination.
#[derive(Debug, Default)]
pub struct RouteAggregator {
    routes: BTreeMap<RouteKey, RouteColumns>,
    flights: usize,
    missing_delay: usize,
}

impl RouteAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one flight to its route's columns.
    ///
    /// A missing delay is counted and treated as `0`, both in the delay
    /// column and in the ratio.
    pub fn add(&mut self, flight: &ParsedFlight) {
        let delay = match flight.delay_in_minutes {
            Some(delay) => delay,
            None => {
                self.missing_delay += 1;
                0.0
            }
        };
        let ratio = round_to(delay / flight.duration_in_minutes, RATIO_PLACES);
        let departed_on = flight.departed_on.timestamp();

        let columns = self
            .routes
            .entry(RouteKey::new(flight.src.as_str(), flight.dst.as_str()))
            .or_default();
        columns.departed_on.push(normalize(departed_on as f64));
        columns.delay_in_minutes.push(normalize(delay));
        columns.delay_ratio.push(Number::Decimal(ratio));
        debug_assert!(
            columns.delay_in_minutes.len() == columns.len()
                && columns.delay_ratio.len() == columns.len()
        );

        self.flights += 1;
    }

    /// Number of flights added.
    pub fn flights(&self) -> usize {
        self.flights
    }

    /// Number of flights whose missing delay was coerced to `0`.
    pub fn missing_delay(&self) -> usize {
        self.missing_delay
    }

    pub fn route(&self, key: &RouteKey) -> Option<&RouteColumns> {
        self.routes.get(key)
    }

    pub fn routes(&self) -> impl Iterator<Item = (&RouteKey, &RouteColumns)> {
        self.routes.iter()
    }

    /// Every populated column, ordered by route then metric.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnKey, &[Number])> {
        self.routes.iter().flat_map(|(route, columns)| {
            Metric::ALL
                .into_iter()
                .map(move |metric| (ColumnKey::new(route.clone(), metric), columns.column(metric)))
        })
    }

    /// Origin → distinct destinations, both sorted.
    pub fn connections(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut connections: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for route in self.routes.keys() {
            connections
                .entry(route.src.as_str())
                .or_default()
                .push(route.dst.as_str());
        }
        connections
    }
}
