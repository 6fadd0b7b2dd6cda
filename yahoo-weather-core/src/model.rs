use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system used for the query and reported values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Imperial,
    Metric,
}

impl Unit {
    /// Single-letter code used in the outbound request ("f" or "c").
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Imperial => "f",
            Unit::Metric => "c",
        }
    }

    pub const fn all() -> &'static [Unit] {
        &[Unit::Imperial, Unit::Metric]
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Imperial => f.write_str("imperial"),
            Unit::Metric => f.write_str("metric"),
        }
    }
}

impl TryFrom<&str> for Unit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "imperial" | "f" => Ok(Unit::Imperial),
            "metric" | "c" => Ok(Unit::Metric),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: imperial (f), metric (c)."
            )),
        }
    }
}

/// Current weather info and forecast as returned by the endpoint.
///
/// A default value represents "nothing fetched yet": all fields empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub location: Option<Location>,
    #[serde(rename = "current_observation")]
    pub observation: Option<Observation>,
    #[serde(default)]
    pub forecasts: Vec<Forecast>,
}

/// Location as resolved by the server from the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub woeid: u32,
    pub city: String,
    pub region: String,
    pub country: String,
    pub lat: f32,
    #[serde(rename = "long")]
    pub lon: f32,
    #[serde(rename = "timezone_id")]
    pub timezone: String,
}

/// Current conditions at the queried location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub wind: Option<Wind>,
    pub atmosphere: Option<Atmosphere>,
    pub astronomy: Option<Astronomy>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub chill: i32,
    pub direction: i32,
    pub speed: f32,
}

/// Barometric pressure trend, from the numeric `rising` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PressureState {
    #[default]
    Steady,
    Rising,
    Falling,
}

impl From<u8> for PressureState {
    fn from(value: u8) -> Self {
        match value {
            1 => PressureState::Rising,
            2 => PressureState::Falling,
            _ => PressureState::Steady,
        }
    }
}

impl From<PressureState> for u8 {
    fn from(value: PressureState) -> Self {
        match value {
            PressureState::Steady => 0,
            PressureState::Rising => 1,
            PressureState::Falling => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub humidity: u8,
    pub visibility: f32,
    pub pressure: f32,
    #[serde(rename = "rising")]
    pub state: PressureState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astronomy {
    pub sunrise: String,
    pub sunset: String,
}

/// Current temperature and textual condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub code: ConditionCode,
    pub temperature: i32,
}

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub day: String,
    /// Unix timestamp (seconds) of the forecast day.
    pub date: i64,
    pub low: i32,
    pub high: i32,
    pub text: String,
    pub code: ConditionCode,
}

impl Forecast {
    pub fn date_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

/// Yahoo condition code, decoded from its integer wire form.
///
/// Codes outside the documented 0..=47 range map to `NotAvailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ConditionCode {
    Tornado,
    TropicalStorm,
    Hurricane,
    SevereThunderstorms,
    Thunderstorms,
    MixedRainAndSnow,
    MixedRainAndSleet,
    MixedSnowAndSleet,
    FreezingDrizzle,
    Drizzle,
    FreezingRain,
    Showers,
    Rain,
    SnowFlurries,
    LightSnowShowers,
    BlowingSnow,
    Snow,
    Hail,
    Sleet,
    Dust,
    Foggy,
    Haze,
    Smoky,
    Blustery,
    Windy,
    Cold,
    Cloudy,
    MostlyCloudyNight,
    MostlyCloudyDay,
    PartlyCloudyNight,
    PartlyCloudyDay,
    ClearNight,
    Sunny,
    FairNight,
    FairDay,
    MixedRainAndHail,
    Hot,
    IsolatedThunderstorms,
    ScatteredThunderstorms,
    ScatteredShowersDay,
    HeavyRain,
    ScatteredSnowShowersDay,
    HeavySnow,
    Blizzard,
    #[default]
    NotAvailable,
    ScatteredShowersNight,
    ScatteredSnowShowersNight,
    ScatteredThundershowers,
}

impl From<i32> for ConditionCode {
    fn from(value: i32) -> Self {
        use ConditionCode::*;

        match value {
            0 => Tornado,
            1 => TropicalStorm,
            2 => Hurricane,
            3 => SevereThunderstorms,
            4 => Thunderstorms,
            5 => MixedRainAndSnow,
            6 => MixedRainAndSleet,
            7 => MixedSnowAndSleet,
            8 => FreezingDrizzle,
            9 => Drizzle,
            10 => FreezingRain,
            11 => Showers,
            12 => Rain,
            13 => SnowFlurries,
            14 => LightSnowShowers,
            15 => BlowingSnow,
            16 => Snow,
            17 => Hail,
            18 => Sleet,
            19 => Dust,
            20 => Foggy,
            21 => Haze,
            22 => Smoky,
            23 => Blustery,
            24 => Windy,
            25 => Cold,
            26 => Cloudy,
            27 => MostlyCloudyNight,
            28 => MostlyCloudyDay,
            29 => PartlyCloudyNight,
            30 => PartlyCloudyDay,
            31 => ClearNight,
            32 => Sunny,
            33 => FairNight,
            34 => FairDay,
            35 => MixedRainAndHail,
            36 => Hot,
            37 => IsolatedThunderstorms,
            38 => ScatteredThunderstorms,
            39 => ScatteredShowersDay,
            40 => HeavyRain,
            41 => ScatteredSnowShowersDay,
            42 => HeavySnow,
            43 => Blizzard,
            45 => ScatteredShowersNight,
            46 => ScatteredSnowShowersNight,
            47 => ScatteredThundershowers,
            _ => NotAvailable,
        }
    }
}

impl From<ConditionCode> for i32 {
    fn from(value: ConditionCode) -> Self {
        use ConditionCode::*;

        match value {
            Tornado => 0,
            TropicalStorm => 1,
            Hurricane => 2,
            SevereThunderstorms => 3,
            Thunderstorms => 4,
            MixedRainAndSnow => 5,
            MixedRainAndSleet => 6,
            MixedSnowAndSleet => 7,
            FreezingDrizzle => 8,
            Drizzle => 9,
            FreezingRain => 10,
            Showers => 11,
            Rain => 12,
            SnowFlurries => 13,
            LightSnowShowers => 14,
            BlowingSnow => 15,
            Snow => 16,
            Hail => 17,
            Sleet => 18,
            Dust => 19,
            Foggy => 20,
            Haze => 21,
            Smoky => 22,
            Blustery => 23,
            Windy => 24,
            Cold => 25,
            Cloudy => 26,
            MostlyCloudyNight => 27,
            MostlyCloudyDay => 28,
            PartlyCloudyNight => 29,
            PartlyCloudyDay => 30,
            ClearNight => 31,
            Sunny => 32,
            FairNight => 33,
            FairDay => 34,
            MixedRainAndHail => 35,
            Hot => 36,
            IsolatedThunderstorms => 37,
            ScatteredThunderstorms => 38,
            ScatteredShowersDay => 39,
            HeavyRain => 40,
            ScatteredSnowShowersDay => 41,
            HeavySnow => 42,
            Blizzard => 43,
            NotAvailable => 44,
            ScatteredShowersNight => 45,
            ScatteredSnowShowersNight => 46,
            ScatteredThundershowers => 47,
        }
    }
}
