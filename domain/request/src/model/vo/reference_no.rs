use std::{fmt, str::FromStr};

use anyhow::bail;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const REFERENCE_PREFIX: &str = "MERF";

static REFERENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^MERF-\d{4}-\d{4,}$").expect("static reference pattern"));

/// Human readable request identifier, `MERF-<year>-<seq>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceNo(String);

impl ReferenceNo {
    /// Reference for the record following `count` existing records.
    pub fn generate(year: i32, count: usize) -> Self {
        Self(format!("{REFERENCE_PREFIX}-{year}-{:04}", count + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl FromStr for ReferenceNo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !REFERENCE_PATTERN.is_match(s) {
            bail!("\"{s}\" is not a reference no like {REFERENCE_PREFIX}-2024-0001");
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for ReferenceNo {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReferenceNo> for String {
    fn from(value: ReferenceNo) -> Self {
        value.0
    }
}

impl fmt::Display for ReferenceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
