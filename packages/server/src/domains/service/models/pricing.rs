use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pricing model for a directory entry.
///
/// Also part of the discovery oracle's response schema, so candidates arrive
/// with a value from this set or none at all.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Pricing {
    Free,
    #[default]
    Freemium,
    Paid,
    Subscription,
}

impl std::fmt::Display for Pricing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pricing::Free => write!(f, "free"),
            Pricing::Freemium => write!(f, "freemium"),
            Pricing::Paid => write!(f, "paid"),
            Pricing::Subscription => write!(f, "subscription"),
        }
    }
}

impl std::str::FromStr for Pricing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "free" => Ok(Pricing::Free),
            "freemium" => Ok(Pricing::Freemium),
            "paid" => Ok(Pricing::Paid),
            "subscription" => Ok(Pricing::Subscription),
            _ => Err(anyhow::anyhow!("Invalid pricing model: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_strings() {
        for pricing in [
            Pricing::Free,
            Pricing::Freemium,
            Pricing::Paid,
            Pricing::Subscription,
        ] {
            let parsed: Pricing = pricing.to_string().parse().unwrap();
            assert_eq!(pricing, parsed);
        }
    }

    #[test]
    fn defaults_to_freemium() {
        assert_eq!(Pricing::default(), Pricing::Freemium);
    }
}
