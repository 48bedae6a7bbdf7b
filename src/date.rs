use std::fmt;
use std::str::FromStr;

/// "YYYY-MM" of a monthly dump, ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8, // 1..=12
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s.split_once('-').ok_or("expected YYYY-MM")?;
        let year: u16 = y.parse().map_err(|_| "invalid year")?;
        let month: u8 = m.parse().map_err(|_| "invalid month")?;
        if !(1..=12).contains(&month) {
            return Err("month must be 01..12".into());
        }
        Ok(Self { year, month })
    }
}
