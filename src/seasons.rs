//! Series seasons and their schedules.

use crate::codec::Timestamp;
use crate::licence::{LicenceCategory, LicenceClass};
use crate::{ApiRequest, Client, Result};
use serde::{Deserialize, Serialize};

const GET_SEASONS_PATH: &str = "/membersite/member/GetSeasons";

const SEASON_FIELDS: &str = "year,quarter,seriesid,active,catid,carclasses,tracks,start,end,\
cars,raceweek,category,serieslicgroupid,names_arr,seasonid,carid,seriesshortname";

/// One season of one series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Season {
    pub active: bool,
    pub year: i32,
    pub quarter: i32,

    /// The current race week, counted from zero.
    #[serde(rename = "raceweek")]
    pub week: i32,

    #[serde(rename = "seasonid")]
    pub season_id: i64,

    #[serde(rename = "seriesid")]
    pub series_id: i64,

    #[serde(rename = "seriesshortname")]
    pub short_name: String,

    #[serde(rename = "serieslicgroupid")]
    pub licence_class: LicenceClass,

    #[serde(rename = "catid")]
    pub category: LicenceCategory,

    pub start: Timestamp,
    pub end: Timestamp,

    pub tracks: Vec<SeasonTrack>,

    #[serde(rename = "carclasses")]
    pub car_classes: Vec<CarClass>,
}

/// A track on a season's schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonTrack {
    pub id: u32,
    #[serde(rename = "pkgid")]
    pub package_id: u32,
    pub name: String,
    #[serde(rename = "config")]
    pub configuration: String,
    pub priority: u32,
    #[serde(rename = "raceweek")]
    pub race_week: i32,
    #[serde(rename = "timeOfDay")]
    pub time_of_day: i32,
}

/// A class of cars racing together in a season.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CarClass {
    pub id: u32,
    pub name: String,
    #[serde(rename = "shortname")]
    pub short_name: String,
    #[serde(rename = "relspeed")]
    pub relative_speed: i32,
    pub cars: Vec<Car>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Car {
    pub id: u32,
    pub name: String,
}

/// Sorts seasons chronologically by year, quarter and race week.
pub fn sort_seasons(seasons: &mut [Season]) {
    seasons.sort_by_key(|s| (s.year, s.quarter, s.week));
}

impl Client {
    /// Lists series seasons, optionally only those currently running.
    pub async fn get_seasons(&self, only_active: bool) -> Result<Vec<Season>> {
        let request = ApiRequest::get(GET_SEASONS_PATH)
            .with_query_param("fields", SEASON_FIELDS)
            .with_query_param("onlyActive", if only_active { "1" } else { "0" });

        let response = self.call(request).await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(year: i32, quarter: i32, week: i32) -> Season {
        Season {
            year,
            quarter,
            week,
            ..Season::default()
        }
    }

    #[test]
    fn test_sort_seasons() {
        let mut seasons = vec![season(2021, 1, 3), season(2020, 4, 11), season(2021, 1, 0), season(2020, 4, 2)];
        sort_seasons(&mut seasons);

        let order: Vec<_> = seasons.iter().map(|s| (s.year, s.quarter, s.week)).collect();
        assert_eq!(order, [(2020, 4, 2), (2020, 4, 11), (2021, 1, 0), (2021, 1, 3)]);
    }

    #[test]
    fn test_season_decode() {
        let json = r#"{
            "active": true, "year": 2021, "quarter": 2, "raceweek": 5,
            "seasonid": 3210, "seriesid": 34, "seriesshortname": "Advanced Mazda MX-5 Cup",
            "serieslicgroupid": 2, "catid": 2,
            "start": 1615939200000, "end": 1623196800000,
            "tracks": [{"id": 127, "pkgid": 91, "name": "Road America", "config": "Full Course",
                        "priority": 0, "raceweek": 0, "timeOfDay": 2}],
            "carclasses": [{"id": 74, "name": "Mazda MX-5 Cup", "shortname": "MX5",
                            "relspeed": 30, "cars": [{"id": 67, "name": "Global Mazda MX-5 Cup"}]}]
        }"#;

        let season: Season = serde_json::from_str(json).unwrap();
        assert_eq!(season.short_name, "Advanced Mazda MX-5 Cup");
        assert_eq!(season.licence_class, LicenceClass::D);
        assert_eq!(season.category, LicenceCategory::Road);
        assert_eq!(season.start.as_millis(), 1_615_939_200_000);
        assert_eq!(season.tracks[0].configuration, "Full Course");
        assert_eq!(season.car_classes[0].cars[0].name, "Global Mazda MX-5 Cup");
    }
}
