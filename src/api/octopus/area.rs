use std::str::FromStr;

use crate::prelude::*;

/// Distribution Network Operator region of Great Britain.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum AreaCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
    L,
    M,
    N,
    P,
}

impl AreaCode {
    pub const ALL: [Self; 14] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::P,
    ];

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::A => "Eastern England",
            Self::B => "East Midlands",
            Self::C => "London",
            Self::D => "Merseyside and North Wales",
            Self::E => "West Midlands",
            Self::F => "North Eastern England",
            Self::G => "North Western England",
            Self::H => "Southern England",
            Self::J => "South Eastern England",
            Self::K => "Southern Wales",
            Self::L => "South Western England",
            Self::M => "Yorkshire",
            Self::N => "Southern Scotland",
            Self::P => "Northern Scotland",
        }
    }
}

impl FromStr for AreaCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|area| area.to_string().eq_ignore_ascii_case(s))
            .with_context(|| format!("`{s}` is not a valid area code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_ok() -> Result {
        assert_eq!("L".parse::<AreaCode>()?, AreaCode::L);
        assert_eq!(" c ".parse::<AreaCode>()?, AreaCode::C);
        Ok(())
    }

    #[test]
    fn test_from_str_err() {
        assert!("I".parse::<AreaCode>().is_err());
        assert!("LL".parse::<AreaCode>().is_err());
        assert!("".parse::<AreaCode>().is_err());
    }
}
