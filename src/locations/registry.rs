//! Builds the list of selectable locations from the states present in the daily
//! dataset and resolves location identifiers back to them.

use crate::locations::timezone::KnownTimeZone;
use crate::types::location::Location;
use crate::types::rows::daily::DailyRow;
use log::debug;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

const COUNTRY_NAME: &str = "United States";

/// Lowercases `value`, replaces every run of characters outside `[a-z0-9]` with a
/// single `-` and drops a leading and a trailing `-`.
///
/// # Examples
///
/// ```
/// use state_weather::slugify;
///
/// assert_eq!(slugify("New York"), "new-york");
/// assert_eq!(slugify("  Missouri!!"), "missouri");
/// ```
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut in_separator = false;
    for ch in value.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            in_separator = false;
        } else if !in_separator {
            slug.push('-');
            in_separator = true;
        }
    }
    let trimmed = slug.strip_prefix('-').unwrap_or(&slug);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Case-insensitive name order with a case-sensitive tie break, so the order is
/// total and does not depend on input order.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    by_id: HashMap<String, usize>,
}

impl LocationRegistry {
    /// Creates one location per distinct state name, sorted by name.
    ///
    /// Two names with the same slug share an identifier; lookups by that
    /// identifier resolve to the one that sorts last.
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<&str> = states.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        names.sort_by(|a, b| compare_names(a, b));

        let locations: Vec<Location> = names
            .into_iter()
            .map(|state| Location {
                id: slugify(state),
                latitude: 0.0,
                longitude: 0.0,
                city_name: String::new(),
                state_name: state.to_string(),
                country_name: COUNTRY_NAME.to_string(),
                timezone: KnownTimeZone::for_state(state).name().to_string(),
            })
            .collect();

        let by_id = locations
            .iter()
            .enumerate()
            .map(|(index, location)| (location.id.clone(), index))
            .collect();

        Self { locations, by_id }
    }

    pub fn from_daily_rows(rows: &[DailyRow]) -> Self {
        Self::from_states(rows.iter().map(|row| row.state.as_str()))
    }

    /// All locations in name order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Exact lookup by identifier.
    pub fn get(&self, id: &str) -> Option<&Location> {
        self.by_id.get(id).map(|&index| &self.locations[index])
    }

    /// Looks up `id`, falling back to the first location for unknown identifiers.
    /// `None` only when there are no locations at all.
    pub fn resolve(&self, id: &str) -> Option<&Location> {
        self.get(id).or_else(|| {
            let fallback = self.locations.first();
            if let Some(location) = fallback {
                debug!(
                    "Unknown location id '{}', falling back to '{}'",
                    id, location.id
                );
            }
            fallback
        })
    }

    /// Timezone assigned to `state_name`.
    pub fn timezone_for_state(state_name: &str) -> &'static str {
        KnownTimeZone::for_state(state_name).name()
    }
}
