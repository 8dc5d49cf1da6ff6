use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;

/// Majors of the faculty, each one is a study plan on the website
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Major {
    #[default]
    CienciasComputacion,
    Actuaria,
    #[value(name = "biologia-2025")]
    Biologia2025,
    #[value(name = "biologia-1997")]
    Biologia1997,
    Fisica,
    FisicaBiomedica,
    Matematicas,
    MatematicasAplicadas,
}

impl Major {
    /// Identifier of the study plan used in the URL
    pub fn plan(self) -> u32 {
        match self {
            Self::CienciasComputacion => 1556,
            Self::Actuaria => 2017,
            Self::Biologia2025 => 2272,
            Self::Biologia1997 => 181,
            Self::Fisica => 1081,
            Self::FisicaBiomedica => 2016,
            Self::Matematicas => 217,
            Self::MatematicasAplicadas => 2055,
        }
    }

    /// Name given on the command line, i.e.: `biologia-2025`
    pub fn name(self) -> String {
        self.to_possible_value()
            .map(|value| value.get_name().to_owned())
            .unwrap_or_default()
    }
}

/// Academic term, i.e.: `20261` is the first term of 2026
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term {
    pub year: i32,
    /// 1 (august to december) or 2 (january to june)
    pub period: u8,
}

impl Term {
    /// Term running at this date
    ///
    /// The first term of a year starts in the summer of the previous one.
    pub fn at(date: NaiveDate) -> Self {
        if date.month() > 6 {
            // From july to december
            Self {
                year: date.year() + 1,
                period: 1,
            }
        } else {
            // From january to june
            Self {
                year: date.year(),
                period: 2,
            }
        }
    }

    /// Code used by the website
    pub fn code(self) -> String {
        format!("{}{}", self.year, self.period)
    }
}

impl Default for Term {
    fn default() -> Self {
        Self {
            year: 2026,
            period: 1,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.period)
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("current") {
            return Ok(Self::at(chrono::Local::now().date_naive()));
        }

        let invalid = || format!("invalid term `{s}`, expected YYYYN (i.e.: 20261) or `current`");
        if s.len() != 5 || !s.is_char_boundary(4) {
            return Err(invalid());
        }

        let (year, period) = s.split_at(4);
        match (year.parse(), period.parse()) {
            (Ok(year), Ok(period @ (1 | 2))) => Ok(Self { year, period }),
            _ => Err(invalid()),
        }
    }
}
