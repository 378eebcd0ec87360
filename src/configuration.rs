// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Settings of a conversion, read from a JSON file.

use crate::error::Error;
use crate::objects::{TimePeriod, TimeWindow};
use anyhow::Context;
use chrono::NaiveTime;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path;
use std::str::FromStr;
use tracing::info;

/// What to do when a file to write already exists.
#[derive(Derivative, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// Replace the file
    Overwrite,
    /// Leave the file and go on
    Skip,
    /// Stop with an error
    #[derivative(Default)]
    Abort,
}

impl FromStr for WritePolicy {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(WritePolicy::Overwrite),
            "skip" => Ok(WritePolicy::Skip),
            "abort" => Ok(WritePolicy::Abort),
            _ => Err(Error::InvalidValue {
                what: "write policy",
                value: s.to_string(),
            }),
        }
    }
}

fn window(start_hour: u32, start_minute: u32, end_hour: u32, end_minute: u32) -> TimeWindow {
    TimeWindow {
        start: NaiveTime::from_hms_opt(start_hour, start_minute, 0).unwrap_or_default(),
        end: NaiveTime::from_hms_opt(end_hour, end_minute, 0).unwrap_or_default(),
    }
}

/// Clock times of the five time periods.
#[derive(Derivative, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct TimePeriods {
    #[derivative(Default(value = "window(6, 0, 9, 0)"))]
    #[serde(rename = "AM")]
    am: TimeWindow,
    #[derivative(Default(value = "window(9, 0, 15, 30)"))]
    #[serde(rename = "MD")]
    md: TimeWindow,
    #[derivative(Default(value = "window(15, 30, 18, 30)"))]
    #[serde(rename = "PM")]
    pm: TimeWindow,
    #[derivative(Default(value = "window(18, 30, 3, 0)"))]
    #[serde(rename = "EV")]
    ev: TimeWindow,
    #[derivative(Default(value = "window(3, 0, 6, 0)"))]
    #[serde(rename = "EA")]
    ea: TimeWindow,
}

impl TimePeriods {
    /// Clock times of a time period.
    pub fn window(&self, period: TimePeriod) -> TimeWindow {
        match period {
            TimePeriod::AM => self.am,
            TimePeriod::MD => self.md,
            TimePeriod::PM => self.pm,
            TimePeriod::EV => self.ev,
            TimePeriod::EA => self.ea,
        }
    }
}

/// Description of a Cube mode.
#[derive(Derivative, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
pub struct ModeConfig {
    /// Name of the mode
    pub name: String,
    /// GTFS route type, bus when absent
    #[serde(default = "default_route_type")]
    #[derivative(Default(value = "default_route_type()"))]
    pub route_type: u32,
    /// Operator of the lines of this mode
    #[serde(default)]
    pub operator: Option<String>,
    /// Base fare of the mode, in cents
    #[serde(default)]
    pub fare: Option<u32>,
}

fn default_route_type() -> u32 {
    3
}

fn de_currency_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected::Other};
    let string = String::deserialize(deserializer)?;
    let currency_code = iso4217::alpha3(&string).ok_or_else(|| {
        D::Error::invalid_value(
            Other("unrecognized currency code (ISO-4217)"),
            &"3-letters currency code (ISO-4217)",
        )
    })?;
    Ok(String::from(currency_code.alpha3))
}

/// Settings of a conversion.
#[derive(Derivative, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct Configuration {
    /// Clock times of the time periods
    pub time_periods: TimePeriods,
    /// Modes by Cube mode number
    pub modes: BTreeMap<u32, ModeConfig>,
    /// Operator of the lines without `OWNER` whose mode has no operator
    #[derivative(Default(value = "\"UNKNOWN\".to_string()"))]
    pub default_operator: String,
    /// ISO-4217 currency of the fares
    #[serde(deserialize_with = "de_currency_code")]
    #[derivative(Default(value = "\"USD\".to_string()"))]
    pub currency: String,
    /// What to do with files already present in the output directories
    pub on_existing_file: WritePolicy,
}

impl Configuration {
    /// Description of a mode, if configured.
    pub fn mode(&self, mode: u32) -> Option<&ModeConfig> {
        self.modes.get(&mode)
    }

    /// GTFS route type of a mode.
    pub fn route_type(&self, mode: u32) -> u32 {
        self.mode(mode)
            .map_or_else(default_route_type, |m| m.route_type)
    }

    /// Operator of a line: its `OWNER`, or the operator of its mode, or
    /// the default operator.
    pub fn operator(&self, mode: Option<u32>, owner: Option<String>) -> String {
        owner
            .or_else(|| mode.and_then(|m| self.mode(m)).and_then(|m| m.operator.clone()))
            .unwrap_or_else(|| self.default_operator.clone())
    }
}

/// Read a JSON configuration file. Without file, or for the fields the file
/// leaves out, the defaults apply.
///
/// Below is an example of this file
/// ```text
/// {
///     "time_periods": {
///         "AM": { "start": "06:00:00", "end": "09:00:00" }
///     },
///     "modes": {
///         "11": { "name": "Local bus", "route_type": 3, "operator": "SF_MUNI", "fare": 250 },
///         "30": { "name": "BART", "route_type": 1, "operator": "BART" }
///     },
///     "default_operator": "UNKNOWN",
///     "currency": "USD",
///     "on_existing_file": "overwrite"
/// }
/// ```
pub fn read_config<P: AsRef<path::Path>>(config_path: Option<P>) -> anyhow::Result<Configuration> {
    match config_path {
        Some(config_path) => {
            let config_path = config_path.as_ref();
            info!("Reading configuration from {:?}", config_path);
            let json_config_file = File::open(config_path)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            let config: Configuration = serde_json::from_reader(json_config_file)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            Ok(config)
        }
        None => Ok(Configuration::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = read_config(None::<&str>).unwrap();
        assert_eq!("USD", config.currency);
        assert_eq!(WritePolicy::Abort, config.on_existing_file);
        let ev = config.time_periods.window(TimePeriod::EV);
        assert_eq!(NaiveTime::from_hms_opt(18, 30, 0).unwrap(), ev.start);
        assert_eq!(NaiveTime::from_hms_opt(3, 0, 0).unwrap(), ev.end);
        assert_eq!(3, config.route_type(11));
    }

    #[test]
    fn partial_file() {
        let config: Configuration = serde_json::from_str(
            r#"{
                "time_periods": { "AM": { "start": "05:30:00", "end": "09:30:00" } },
                "modes": { "30": { "name": "BART", "route_type": 1, "operator": "BART" } },
                "currency": "EUR",
                "on_existing_file": "skip"
            }"#,
        )
        .unwrap();
        assert_eq!(
            NaiveTime::from_hms_opt(5, 30, 0).unwrap(),
            config.time_periods.window(TimePeriod::AM).start
        );
        assert_eq!(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            config.time_periods.window(TimePeriod::MD).start
        );
        assert_eq!("BART", config.mode(30).unwrap().name);
        assert_eq!(1, config.route_type(30));
        assert_eq!("BART", config.operator(Some(30), None));
        assert_eq!("MUNI", config.operator(Some(30), Some("MUNI".to_string())));
        assert_eq!("UNKNOWN", config.operator(Some(11), None));
        assert_eq!(WritePolicy::Skip, config.on_existing_file);
    }

    #[test]
    fn bad_currency() {
        let config: Result<Configuration, _> = serde_json::from_str(r#"{ "currency": "XYZ1" }"#);
        assert!(config.is_err());
    }

    #[test]
    fn write_policy_from_str() {
        assert_eq!(WritePolicy::Overwrite, "Overwrite".parse().unwrap());
        assert!("replace".parse::<WritePolicy>().is_err());
    }
}
