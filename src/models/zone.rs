//! Rate zones.
//!
//! A zone is one price column of the carrier's rate sheet. Several origin
//! countries can share a column, so countries are resolved to a zone through
//! the [`ZoneMap`](crate::rates::ZoneMap) rather than by column number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A price column of the rate sheet.
///
/// # Example
///
/// ```
/// use freight_quote::models::Zone;
/// use std::str::FromStr;
///
/// let zone = Zone::from_str("taiwan_hong_kong").unwrap();
/// assert_eq!(zone, Zone::TaiwanHongKong);
/// assert_eq!(zone.sheet_column(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Mainland China.
    China,
    /// Taiwan and Hong Kong share one column.
    TaiwanHongKong,
    /// Thailand.
    Thailand,
}

impl Zone {
    /// Every zone, in sheet column order.
    pub const ALL: [Zone; 3] = [Zone::China, Zone::TaiwanHongKong, Zone::Thailand];

    /// The snake_case identifier used in rate source files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::China => "china",
            Zone::TaiwanHongKong => "taiwan_hong_kong",
            Zone::Thailand => "thailand",
        }
    }

    /// The column of the carrier's import rate sheet that prices this zone.
    pub fn sheet_column(&self) -> u32 {
        match self {
            Zone::China => 9,
            Zone::TaiwanHongKong => 10,
            Zone::Thailand => 11,
        }
    }

    /// Position of the zone in [`Zone::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Zone::China => 0,
            Zone::TaiwanHongKong => 1,
            Zone::Thailand => 2,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|zone| zone.as_str() == s.trim())
            .ok_or_else(|| format!("unknown zone '{}'", s))
    }
}
