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

//! The five time periods of the travel demand model.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time period, in the order of the `FREQ[1]`..`FREQ[5]` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    /// AM peak
    AM,
    /// Midday
    MD,
    /// PM peak
    PM,
    /// Evening
    EV,
    /// Early AM
    EA,
}

impl TimePeriod {
    /// Every time period, in frequency index order.
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::AM,
        TimePeriod::MD,
        TimePeriod::PM,
        TimePeriod::EV,
        TimePeriod::EA,
    ];

    /// 0-based position in the frequency array.
    pub fn index(self) -> usize {
        match self {
            TimePeriod::AM => 0,
            TimePeriod::MD => 1,
            TimePeriod::PM => 2,
            TimePeriod::EV => 3,
            TimePeriod::EA => 4,
        }
    }

    /// Line attribute holding the frequency of the period.
    pub fn freq_key(self) -> String {
        format!("FREQ[{}]", self.index() + 1)
    }

    /// Short name, `AM`.
    pub fn name(self) -> &'static str {
        match self {
            TimePeriod::AM => "AM",
            TimePeriod::MD => "MD",
            TimePeriod::PM => "PM",
            TimePeriod::EV => "EV",
            TimePeriod::EA => "EA",
        }
    }
}

impl FromStr for TimePeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TimePeriod::ALL
            .iter()
            .copied()
            .find(|tp| tp.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::TimePeriod(s.to_string()))
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
