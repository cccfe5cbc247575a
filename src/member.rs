//! The logged-in member's profile and career statistics.

use crate::codec::{Rating, StringifiedUint64};
use crate::licence::{LicenceCategory, LicenceClass};
use crate::{ApiRequest, Client, Result};
use serde::{Deserialize, Serialize};

const GET_MEMBER_PATH: &str = "/membersite/member/GetMember";
const CAREER_STATS_PATH: &str = "/memberstats/member/GetCareerStats";

/// The profile of the member who is logged in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(rename = "custID")]
    pub cust_id: u64,

    #[serde(rename = "DisplayName")]
    pub display_name: String,

    #[serde(rename = "licenses")]
    pub licences: Vec<Licence>,

    #[serde(rename = "hasReadPP")]
    pub has_read_privacy_policy: bool,

    #[serde(rename = "hasReadTC")]
    pub has_read_terms: bool,
}

impl UserProfile {
    /// The member's licence in one category, if they hold one.
    pub fn licence(&self, category: LicenceCategory) -> Option<&Licence> {
        self.licences.iter().find(|l| l.category == category)
    }
}

/// One per-category licence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Licence {
    #[serde(rename = "licGroup")]
    pub class: LicenceClass,

    #[serde(rename = "licLevel")]
    pub level: i32,

    /// Hundredths of the safety rating.
    #[serde(rename = "srSub")]
    pub sr_sub: StringifiedUint64,

    /// Whole part of the safety rating.
    #[serde(rename = "srPrime")]
    pub sr_prime: StringifiedUint64,

    #[serde(rename = "iRating")]
    pub irating: Rating,

    #[serde(rename = "ttRating")]
    pub tt_rating: Rating,

    #[serde(rename = "mprNumRaces")]
    pub mpr_races: i32,

    #[serde(rename = "mprNumTTs")]
    pub mpr_time_trials: i32,

    #[serde(rename = "catId")]
    pub category: LicenceCategory,

    #[serde(rename = "licLevelDisplayName")]
    pub display_name: String,

    #[serde(rename = "licColor")]
    pub colour: String,

    #[serde(rename = "licGroupDisplayName")]
    pub class_name: String,
}

impl Licence {
    /// The safety rating as shown on the member site, e.g. `3.47`.
    pub fn safety_rating(&self) -> f64 {
        self.sr_prime.get() as f64 + self.sr_sub.get() as f64 / 100.0
    }
}

/// Lifetime statistics for one category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerStats {
    pub category: String,
    pub starts: u32,
    pub wins: u32,
    pub poles: u32,
    #[serde(rename = "top5")]
    pub top_fives: u32,
    #[serde(rename = "lapsLed")]
    pub laps_led: u32,
    #[serde(rename = "totalLaps")]
    pub total_laps: u64,
    #[serde(rename = "totalclubpoints")]
    pub total_club_points: u32,
    #[serde(rename = "avgStart")]
    pub average_start: u32,
    #[serde(rename = "avgFinish")]
    pub average_finish: u32,
    #[serde(rename = "winperc")]
    pub win_percentage: f64,
    #[serde(rename = "top5Perc")]
    pub top_five_percentage: f64,
    #[serde(rename = "lapsLedPerc")]
    pub laps_led_percentage: f64,
    #[serde(rename = "avgIncPerRace")]
    pub average_incidents_per_race: f64,
    #[serde(rename = "avgPtsPerRace")]
    pub average_points_per_race: f64,
}

impl Client {
    /// Fetches the profile of the logged-in member.
    pub async fn get_profile(&self) -> Result<UserProfile> {
        let response = self.call(ApiRequest::get(GET_MEMBER_PATH)).await?;
        Ok(response.data)
    }

    /// Fetches lifetime career statistics for a member, one entry per category.
    pub async fn get_career_stats(&self, cust_id: u64) -> Result<Vec<CareerStats>> {
        let request = ApiRequest::get(CAREER_STATS_PATH).with_query_param("custid", cust_id.to_string());
        let response = self.call(request).await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_decodes_licences() {
        let json = r#"{
            "custID": 123456,
            "DisplayName": "Jane Driver",
            "hasReadPP": true,
            "hasReadTC": true,
            "licenses": [
                {"licGroup": 4, "licLevel": 14, "srSub": "47", "srPrime": "3",
                 "iRating": 2150, "ttRating": "---", "mprNumRaces": 4, "mprNumTTs": 0,
                 "catId": 2, "licLevelDisplayName": "Class B 3.47",
                 "licColor": "0x00c702", "licGroupDisplayName": "Class B"},
                {"licGroup": 1, "licLevel": 1, "srSub": "50", "srPrime": "2",
                 "iRating": "---", "ttRating": "---", "catId": 1}
            ]
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.cust_id, 123456);
        assert_eq!(profile.display_name, "Jane Driver");

        let road = profile.licence(LicenceCategory::Road).unwrap();
        assert_eq!(road.class, LicenceClass::B);
        assert_eq!(road.irating.value(), Some(2150));
        assert!(road.tt_rating.is_unrated());
        assert!((road.safety_rating() - 3.47).abs() < 1e-9);

        let oval = profile.licence(LicenceCategory::Oval).unwrap();
        assert!(oval.irating.is_unrated());
        assert_eq!(oval.class.to_string(), "R");
    }

    #[test]
    fn test_profile_with_unfamiliar_category() {
        let json = r#"{"custID": 1, "licenses": [{"catId": 5, "licGroup": 4}]}"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        let licence = profile.licence(LicenceCategory::Unknown(5)).unwrap();
        assert_eq!(licence.class, LicenceClass::B);
        assert_eq!(licence.category.to_string(), "5");
    }

    #[test]
    fn test_career_stats_decode() {
        let json = r#"[{"wins": 3, "totalclubpoints": 120, "winperc": 4.2, "poles": 1,
            "avgStart": 8, "avgFinish": 7, "top5Perc": 30.5, "totalLaps": 5021,
            "avgIncPerRace": 3.1, "avgPtsPerRace": 42.0, "lapsLed": 88, "top5": 22,
            "lapsLedPerc": 1.75, "category": "Road", "starts": 71}]"#;

        let stats: Vec<CareerStats> = serde_json::from_str(json).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].category, "Road");
        assert_eq!(stats[0].starts, 71);
        assert_eq!(stats[0].total_laps, 5021);
        assert_eq!(stats[0].top_fives, 22);
    }
}
