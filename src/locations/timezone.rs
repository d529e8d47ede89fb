//! The fixed timezone tables: which state uses which zone, and the UTC offset
//! assumed for each zone. Offsets ignore daylight saving.

/// Timezones with a known UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownTimeZone {
    /// `America/Chicago`, UTC-6.
    Chicago,
    /// `America/New_York`, UTC-5.
    NewYork,
}

/// Zone used for states missing from the state table and for offset lookups of
/// unknown zone names.
pub const DEFAULT_TIMEZONE: KnownTimeZone = KnownTimeZone::NewYork;

impl KnownTimeZone {
    pub const ALL: [KnownTimeZone; 2] = [KnownTimeZone::Chicago, KnownTimeZone::NewYork];

    /// IANA name of the zone.
    pub fn name(&self) -> &'static str {
        match self {
            KnownTimeZone::Chicago => "America/Chicago",
            KnownTimeZone::NewYork => "America/New_York",
        }
    }

    pub fn offset_minutes(&self) -> i32 {
        match self {
            KnownTimeZone::Chicago => -360,
            KnownTimeZone::NewYork => -300,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|zone| zone.name() == name)
    }

    /// Zone of a state. States not in the table get [`DEFAULT_TIMEZONE`].
    pub fn for_state(state_name: &str) -> Self {
        match state_name {
            "Missouri" => KnownTimeZone::Chicago,
            _ => DEFAULT_TIMEZONE,
        }
    }
}

/// UTC offset in minutes for an IANA zone name; unknown names get the offset of
/// [`DEFAULT_TIMEZONE`] (-300).
pub fn offset_minutes_for(timezone: &str) -> i32 {
    KnownTimeZone::from_name(timezone)
        .unwrap_or(DEFAULT_TIMEZONE)
        .offset_minutes()
}
