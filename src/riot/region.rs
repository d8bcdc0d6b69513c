use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Platform routing values for Riot API (League-v4, Champion-Mastery-v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    BR1,
    LA1,
    LA2,
    NA1,
    JP1,
    KR,
    EUN1,
    EUW1,
    ME1,
    RU,
    TR1,
    OC1,
    PH2,
    SG2,
    TH2,
    TW2,
    VN2,
}

/// Routing host, regional cluster and accepted short names of every platform.
const PLATFORMS: &[(Platform, &str, Region, &[&str])] = &[
    (Platform::BR1, "br1", Region::Americas, &["br"]),
    (Platform::LA1, "la1", Region::Americas, &["lan"]),
    (Platform::LA2, "la2", Region::Americas, &["las"]),
    (Platform::NA1, "na1", Region::Americas, &["na"]),
    (Platform::JP1, "jp1", Region::Asia, &["jp"]),
    (Platform::KR, "kr", Region::Asia, &[]),
    (Platform::EUN1, "eun1", Region::Europe, &["eune", "eun"]),
    (Platform::EUW1, "euw1", Region::Europe, &["euw"]),
    (Platform::ME1, "me1", Region::Europe, &["me"]),
    (Platform::RU, "ru", Region::Europe, &[]),
    (Platform::TR1, "tr1", Region::Europe, &["tr"]),
    (Platform::OC1, "oc1", Region::Sea, &["oce", "oc"]),
    (Platform::PH2, "ph2", Region::Sea, &["ph"]),
    (Platform::SG2, "sg2", Region::Sea, &["sg"]),
    (Platform::TH2, "th2", Region::Sea, &["th"]),
    (Platform::TW2, "tw2", Region::Sea, &["tw"]),
    (Platform::VN2, "vn2", Region::Sea, &["vn"]),
];

impl Platform {
    fn entry(self) -> &'static (Platform, &'static str, Region, &'static [&'static str]) {
        PLATFORMS
            .iter()
            .find(|(platform, ..)| *platform == self)
            .unwrap_or(&PLATFORMS[0])
    }

    pub fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    pub fn to_region(self) -> Region {
        self.entry().2
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PLATFORMS
            .iter()
            .find(|(_, host, _, aliases)| {
                *host == wanted || aliases.iter().any(|alias| *alias == wanted)
            })
            .map(|(platform, ..)| *platform)
            .ok_or_else(|| AppError::InvalidRegion(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Regional routing values for Riot API (Account-v1, Match-v5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl Region {
    pub fn base_url(&self) -> String {
        format!("https://{self}.api.riotgames.com")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Americas => "americas",
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Sea => "sea",
        })
    }
}
