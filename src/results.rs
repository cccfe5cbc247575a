//! Session results, result search and lap data.

use crate::codec::{Laptime, Milliseconds, SimTime, Timestamp};
use crate::licence::{LicenceCategory, LicenceClass};
use crate::request::Body;
use crate::{ApiRequest, Client, Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use std::fmt;

const SUBSESSION_RESULTS_PATH: &str = "/membersite/member/GetSubsessionResults";
const SEARCH_RESULTS_PATH: &str = "/memberstats/member/GetResults";
const GET_LAPS_PATH: &str = "/membersite/member/GetLaps";

/// Rows returned by one search.
const RESULT_WINDOW: u32 = 100;

/// The session name the member site gives to the race part of an event.
pub const RACE_SESSION: &str = "RACE";

/// A column the result search can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    #[default]
    StartTime,
    SeasonQuarter,
    RaceWeek,
    EventType,
    SeriesName,
    ClassAndCar,
    TrackName,
    StartPosition,
    FinishPosition,
    Incidents,
    ChampionshipPoints,
    StrengthOfField,
    WinnerName,
}

impl SortField {
    pub const ALL: [SortField; 13] = [
        SortField::StartTime,
        SortField::SeasonQuarter,
        SortField::RaceWeek,
        SortField::EventType,
        SortField::SeriesName,
        SortField::ClassAndCar,
        SortField::TrackName,
        SortField::StartPosition,
        SortField::FinishPosition,
        SortField::Incidents,
        SortField::ChampionshipPoints,
        SortField::StrengthOfField,
        SortField::WinnerName,
    ];

    /// The name the member site uses for this column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::StartTime => "start_time",
            SortField::SeasonQuarter => "season_quarter",
            SortField::RaceWeek => "race_week_num",
            SortField::EventType => "evttypename",
            SortField::SeriesName => "series_shortname",
            SortField::ClassAndCar => "car_class_name",
            SortField::TrackName => "track_name",
            SortField::StartPosition => "starting_position",
            SortField::FinishPosition => "finishing_position",
            SortField::Incidents => "incidents",
            SortField::ChampionshipPoints => "champpoints",
            SortField::StrengthOfField => "strengthoffield",
            SortField::WinnerName => "winnerdisplayname",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricts a search to one season, and optionally one week of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonFilter {
    pub year: i32,
    pub quarter: i32,
    pub week: Option<i32>,
}

/// Restricts a search to sessions starting between two instants.
///
/// Both ends are sent with whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub lower: DateTime<Utc>,
    pub upper: DateTime<Utc>,
}

impl DateRange {
    pub fn new(lower: DateTime<Utc>, upper: DateTime<Utc>) -> Self {
        Self { lower, upper }
    }

    /// The window of length `span` ending now.
    pub fn ending_now(span: TimeDelta) -> Self {
        let upper = Utc::now();
        Self::new(upper - span, upper)
    }
}

/// Options for [`Client::search_results`].
///
/// Exactly one of `season` and `date_range` must be set. The defaults select
/// official races in every licence class, newest first, with neither filter
/// chosen.
///
/// ```
/// use irapi::results::{DateRange, SearchResultsOptions};
/// use chrono::TimeDelta;
///
/// let options = SearchResultsOptions {
///     cust_id: 123456,
///     date_range: Some(DateRange::ending_now(TimeDelta::days(14))),
///     ..SearchResultsOptions::default()
/// };
/// assert!(options.query().is_ok());
/// assert!(SearchResultsOptions::default().query().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultsOptions {
    pub include_races: bool,
    pub include_qualifying: bool,
    pub include_time_trials: bool,
    pub include_official: bool,
    pub include_unofficial: bool,
    pub include_rookie: bool,
    pub include_class_d: bool,
    pub include_class_c: bool,
    pub include_class_b: bool,
    pub include_class_a: bool,
    pub include_pro: bool,
    pub include_pro_wc: bool,

    pub season: Option<SeasonFilter>,
    pub date_range: Option<DateRange>,

    /// Only sessions this member took part in. Zero means any member.
    pub cust_id: u64,

    pub sort_by: SortField,
    pub sort_direction: SortDirection,
}

impl Default for SearchResultsOptions {
    fn default() -> Self {
        Self {
            include_races: true,
            include_qualifying: false,
            include_time_trials: false,
            include_official: true,
            include_unofficial: false,
            include_rookie: true,
            include_class_d: true,
            include_class_c: true,
            include_class_b: true,
            include_class_a: true,
            include_pro: true,
            include_pro_wc: true,
            season: None,
            date_range: None,
            cust_id: 0,
            sort_by: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl SearchResultsOptions {
    /// Builds the query parameters for the search, in the order they are sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] unless exactly one of `season` and
    /// `date_range` is set.
    pub fn query(&self) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();
        let mut set = |key: &str, value: String| params.push((key.to_string(), value));

        if self.cust_id > 0 {
            set("custid", self.cust_id.to_string());
        }

        match (&self.season, &self.date_range) {
            (Some(_), Some(_)) => {
                return Err(Error::Configuration(
                    "only one of season or date range may be specified".to_string(),
                ))
            }
            (None, None) => {
                return Err(Error::Configuration(
                    "one of season or date range must be specified".to_string(),
                ))
            }
            (None, Some(range)) => {
                set("starttime_low", Timestamp::new(range.lower).encode());
                set("starttime_high", Timestamp::new(range.upper).encode());
            }
            (Some(season), None) => {
                set("seasonyear", season.year.to_string());
                set("seasonquarter", season.quarter.to_string());
                if let Some(week) = season.week {
                    set("raceweek", week.to_string());
                }
            }
        }

        set("lowerbound", "0".to_string());
        set("upperbound", RESULT_WINDOW.to_string());

        let flags = [
            ("showraces", self.include_races),
            ("showquals", self.include_qualifying),
            ("showtts", self.include_time_trials),
            ("showofficial", self.include_official),
            ("showunofficial", self.include_unofficial),
            ("showrookie", self.include_rookie),
            ("showclassd", self.include_class_d),
            ("showclassc", self.include_class_c),
            ("showclassb", self.include_class_b),
            ("showclassa", self.include_class_a),
            ("showpro", self.include_pro),
            ("showprowc", self.include_pro_wc),
        ];
        for (key, on) in flags {
            set(key, if on { "1" } else { "0" }.to_string());
        }

        set("category[]", "1,2,3,4".to_string());
        set("format", "json".to_string());
        set("sort", self.sort_by.to_string());
        set("order", self.sort_direction.to_string());

        Ok(params)
    }
}

/// The full result of one subsession.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionResult {
    #[serde(rename = "subsessionid")]
    pub id: u64,
    #[serde(rename = "sessionid")]
    pub session_id: u64,
    #[serde(rename = "sessionname")]
    pub session_name: String,

    #[serde(rename = "eventavglap")]
    pub average_lap: Milliseconds,
    #[serde(rename = "catid")]
    pub category: LicenceCategory,
    #[serde(rename = "evttype")]
    pub event_type: i32,
    #[serde(rename = "simsestype")]
    pub sim_session_type: i32,
    #[serde(rename = "specialeventtype")]
    pub special_event_type: i32,
    #[serde(rename = "privatesessionid")]
    pub private_session_id: i64,
    #[serde(rename = "pointstype")]
    pub points_type: String,

    #[serde(rename = "starttime")]
    pub start_time: SimTime,
    #[serde(rename = "simulatedstarttime")]
    pub simulated_start_time: SimTime,
    #[serde(rename = "timeofday")]
    pub time_of_day: i32,

    #[serde(rename = "eventlapscompleted")]
    pub laps_complete: u32,
    #[serde(rename = "nlapsforsoloavg")]
    pub laps_for_solo_average: u32,
    #[serde(rename = "nleadchanges")]
    pub lead_changes: i32,
    #[serde(rename = "cautions")]
    pub cautions: u32,
    #[serde(rename = "cautionlaps")]
    pub caution_laps: u32,
    #[serde(rename = "cautiontype")]
    pub caution_type: i32,
    #[serde(rename = "eventstrengthoffield")]
    pub strength_of_field: u32,

    #[serde(rename = "driver_change_rule")]
    pub driver_change_rule: i32,
    #[serde(rename = "driver_changes")]
    pub driver_changes: u32,
    #[serde(rename = "max_team_drivers")]
    pub max_team_drivers: u32,
    #[serde(rename = "min_team_drivers")]
    pub min_team_drivers: u32,

    #[serde(rename = "seasonID")]
    pub season_id: i64,
    #[serde(rename = "season_name")]
    pub season_name: String,
    #[serde(rename = "seasion_shortname")]
    pub season_short_name: String,
    #[serde(rename = "season_year")]
    pub season_year: i32,
    #[serde(rename = "season_quarter")]
    pub season_quarter: i32,
    #[serde(rename = "race_week_num")]
    pub race_week: i32,
    #[serde(rename = "maxweeks")]
    pub max_weeks: u32,
    #[serde(rename = "seriesid")]
    pub series_id: u64,
    #[serde(rename = "series_name")]
    pub series_name: String,

    #[serde(rename = "trackid")]
    pub track_id: u64,
    #[serde(rename = "track_name")]
    pub track_name: String,
    #[serde(rename = "track_config_name")]
    pub track_config_name: String,
    #[serde(rename = "cornersperlap")]
    pub corners_per_lap: u32,
    #[serde(rename = "leavemarbles")]
    pub leave_marbles: i32,
    #[serde(rename = "rubberlevel_practice")]
    pub rubber_level_practice: i32,
    #[serde(rename = "rubberlevel_qualify")]
    pub rubber_level_qualify: i32,
    #[serde(rename = "rubberlevel_warmup")]
    pub rubber_level_warmup: i32,
    #[serde(rename = "rubberlevel_race")]
    pub rubber_level_race: i32,

    #[serde(rename = "weather_type")]
    pub weather_type: i32,
    #[serde(rename = "weather_skies")]
    pub weather_skies: i32,
    #[serde(rename = "weather_temp_units")]
    pub weather_temperature_units: i32,
    #[serde(rename = "weather_temp_value")]
    pub weather_temperature: f64,
    #[serde(rename = "weather_rh")]
    pub weather_humidity: f64,
    #[serde(rename = "weather_fog_density")]
    pub weather_fog_density: f64,
    #[serde(rename = "weather_wind_dir")]
    pub weather_wind_direction: i32,
    #[serde(rename = "weather_wind_speed_units")]
    pub weather_wind_speed_units: i32,
    #[serde(rename = "weather_wind_speed_value")]
    pub weather_wind_speed: f64,
    #[serde(rename = "weather_var_ongoing")]
    pub weather_variation: i32,

    #[serde(rename = "rows")]
    pub results: Vec<DriverResult>,
}

impl SessionResult {
    /// The rows of one part of the event (e.g. [`RACE_SESSION`]), in finishing order.
    pub fn session_rows(&self, session_name: &str) -> Vec<&DriverResult> {
        let mut rows: Vec<_> = self
            .results
            .iter()
            .filter(|r| r.session_name == session_name)
            .collect();
        rows.sort_by_key(|r| r.finish_position);
        rows
    }
}

/// One driver's line in a session result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverResult {
    #[serde(rename = "displayname")]
    pub name: String,
    #[serde(rename = "carnum")]
    pub car_number: String,
    #[serde(rename = "carid")]
    pub car_id: u32,
    #[serde(rename = "ccName")]
    pub car_class_name: String,
    #[serde(rename = "simsesname")]
    pub session_name: String,

    #[serde(rename = "startpos")]
    pub start_position: i32,
    #[serde(rename = "finishpos")]
    pub finish_position: i32,
    #[serde(rename = "lapscomplete")]
    pub laps_complete: u32,
    #[serde(rename = "bestlapnum")]
    pub best_lap_number: i32,

    #[serde(rename = "oldirating")]
    pub old_irating: i32,
    #[serde(rename = "newirating")]
    pub new_irating: i32,
    #[serde(rename = "newcpi")]
    pub new_cpi: f64,
}

impl DriverResult {
    /// Places gained (positive) or lost (negative).
    pub fn positions_gained(&self) -> i32 {
        self.start_position - self.finish_position
    }

    pub fn irating_change(&self) -> i32 {
        self.new_irating - self.old_irating
    }
}

/// One row of a result search.
///
/// The member site sends these rows with numbered keys (`"1"` to `"48"`)
/// instead of names; the mapping lives in [`COLUMNS`].
#[derive(Debug, Clone, Default)]
pub struct SearchResultData {
    pub subsession_id: u64,
    pub session_id: u64,
    pub cust_id: u64,
    pub display_name: String,
    pub group_name: String,
    pub row_number: i32,
    pub session_rank: i32,

    pub start_time: Timestamp,
    pub finished_at: Timestamp,
    /// Start date as displayed by the member site.
    pub start_date: String,
    /// Start time of day as displayed by the member site.
    pub start_time_of_day: String,

    pub series_id: i64,
    pub season_id: i64,
    pub season_year: i32,
    pub season_quarter: i32,
    pub race_week: i32,
    pub event_type: i32,
    pub official_session: i32,
    pub category: LicenceCategory,
    pub licence_class: LicenceClass,

    pub car_id: u64,
    pub car_class_id: u64,
    pub track_id: u64,

    pub starting_position: i32,
    pub finish_position: i32,
    pub incidents: i32,
    pub championship_points: i32,
    pub championship_points_sort: i32,
    pub club_points: i32,
    pub club_points_sort: i32,
    pub drop_race_points: i32,
    pub strength_of_field: i32,

    pub best_lap_time: String,
    pub best_qualifying_lap_time: String,
    pub subsession_best_lap_time: String,

    pub helmet_licence_level: i32,
    pub helmet_pattern: i32,
    pub helmet_colour_1: String,
    pub helmet_colour_2: String,
    pub helmet_colour_3: String,

    pub winner_name: String,
    pub winners_group_id: i64,
    pub winner_licence_level: i32,
    pub winner_helmet_pattern: i32,
    pub winner_helmet_colour_1: String,
    pub winner_helmet_colour_2: String,
    pub winner_helmet_colour_3: String,
}

impl SearchResultData {
    pub fn is_official(&self) -> bool {
        self.official_session == 1
    }

    pub fn positions_gained(&self) -> i32 {
        self.starting_position - self.finish_position
    }

    /// The member's best lap, if they set a time.
    pub fn best_lap(&self) -> Option<Laptime> {
        Laptime::parse(&self.best_lap_time).ok()
    }

    pub fn best_qualifying_lap(&self) -> Option<Laptime> {
        Laptime::parse(&self.best_qualifying_lap_time).ok()
    }

    /// The fastest lap anyone set in the subsession.
    pub fn subsession_best_lap(&self) -> Option<Laptime> {
        Laptime::parse(&self.subsession_best_lap_time).ok()
    }
}

/// The fields of [`SearchResultData`], one per numbered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    HelmetColour1,
    WinnerHelmetColour1,
    FinishPosition,
    WinnerHelmetColour2,
    WinnerHelmetColour3,
    BestQualifyingLapTime,
    SubsessionBestLapTime,
    RaceWeek,
    SessionId,
    FinishedAt,
    StartTime,
    StartingPosition,
    HelmetColour3,
    HelmetColour2,
    ClubPoints,
    DropRacePoints,
    OfficialSession,
    GroupName,
    SeriesId,
    StartTimeOfDay,
    SeasonId,
    CustId,
    HelmetLicenceLevel,
    WinnerLicenceLevel,
    RowNumber,
    WinnersGroupId,
    SessionRank,
    CarClassId,
    TrackId,
    WinnerName,
    CarId,
    Category,
    SeasonQuarter,
    LicenceClass,
    WinnerHelmetPattern,
    EventType,
    BestLapTime,
    Incidents,
    ChampionshipPoints,
    SubsessionId,
    SeasonYear,
    ChampionshipPointsSort,
    StartDate,
    StrengthOfField,
    HelmetPattern,
    ClubPointsSort,
    DisplayName,
}

/// Which numbered key carries which column. Key `"15"` is the total row count
/// of the search and is not part of a row.
pub const COLUMNS: [(&str, Column); 47] = [
    ("1", Column::HelmetColour1),
    ("2", Column::WinnerHelmetColour1),
    ("3", Column::FinishPosition),
    ("4", Column::WinnerHelmetColour2),
    ("5", Column::WinnerHelmetColour3),
    ("6", Column::BestQualifyingLapTime),
    ("7", Column::SubsessionBestLapTime),
    ("8", Column::RaceWeek),
    ("9", Column::SessionId),
    ("10", Column::FinishedAt),
    ("11", Column::StartTime),
    ("12", Column::StartingPosition),
    ("13", Column::HelmetColour3),
    ("14", Column::HelmetColour2),
    ("16", Column::ClubPoints),
    ("17", Column::DropRacePoints),
    ("18", Column::OfficialSession),
    ("19", Column::GroupName),
    ("20", Column::SeriesId),
    ("21", Column::StartTimeOfDay),
    ("22", Column::SeasonId),
    ("23", Column::CustId),
    ("24", Column::HelmetLicenceLevel),
    ("25", Column::WinnerLicenceLevel),
    ("26", Column::RowNumber),
    ("27", Column::WinnersGroupId),
    ("28", Column::SessionRank),
    ("29", Column::CarClassId),
    ("30", Column::TrackId),
    ("31", Column::WinnerName),
    ("32", Column::CarId),
    ("33", Column::Category),
    ("34", Column::SeasonQuarter),
    ("35", Column::LicenceClass),
    ("36", Column::WinnerHelmetPattern),
    ("37", Column::EventType),
    ("38", Column::BestLapTime),
    ("39", Column::Incidents),
    ("40", Column::ChampionshipPoints),
    ("41", Column::SubsessionId),
    ("42", Column::SeasonYear),
    ("43", Column::ChampionshipPointsSort),
    ("44", Column::StartDate),
    ("45", Column::StrengthOfField),
    ("46", Column::HelmetPattern),
    ("47", Column::ClubPointsSort),
    ("48", Column::DisplayName),
];

fn field<T: DeserializeOwned>(value: &serde_json::Value) -> serde_json::Result<T> {
    T::deserialize(value)
}

impl SearchResultData {
    fn set(&mut self, column: Column, value: &serde_json::Value) -> serde_json::Result<()> {
        match column {
            Column::HelmetColour1 => self.helmet_colour_1 = field(value)?,
            Column::WinnerHelmetColour1 => self.winner_helmet_colour_1 = field(value)?,
            Column::FinishPosition => self.finish_position = field(value)?,
            Column::WinnerHelmetColour2 => self.winner_helmet_colour_2 = field(value)?,
            Column::WinnerHelmetColour3 => self.winner_helmet_colour_3 = field(value)?,
            Column::BestQualifyingLapTime => self.best_qualifying_lap_time = field(value)?,
            Column::SubsessionBestLapTime => self.subsession_best_lap_time = field(value)?,
            Column::RaceWeek => self.race_week = field(value)?,
            Column::SessionId => self.session_id = field(value)?,
            Column::FinishedAt => self.finished_at = field(value)?,
            Column::StartTime => self.start_time = field(value)?,
            Column::StartingPosition => self.starting_position = field(value)?,
            Column::HelmetColour3 => self.helmet_colour_3 = field(value)?,
            Column::HelmetColour2 => self.helmet_colour_2 = field(value)?,
            Column::ClubPoints => self.club_points = field(value)?,
            Column::DropRacePoints => self.drop_race_points = field(value)?,
            Column::OfficialSession => self.official_session = field(value)?,
            Column::GroupName => self.group_name = field(value)?,
            Column::SeriesId => self.series_id = field(value)?,
            Column::StartTimeOfDay => self.start_time_of_day = field(value)?,
            Column::SeasonId => self.season_id = field(value)?,
            Column::CustId => self.cust_id = field(value)?,
            Column::HelmetLicenceLevel => self.helmet_licence_level = field(value)?,
            Column::WinnerLicenceLevel => self.winner_licence_level = field(value)?,
            Column::RowNumber => self.row_number = field(value)?,
            Column::WinnersGroupId => self.winners_group_id = field(value)?,
            Column::SessionRank => self.session_rank = field(value)?,
            Column::CarClassId => self.car_class_id = field(value)?,
            Column::TrackId => self.track_id = field(value)?,
            Column::WinnerName => self.winner_name = field(value)?,
            Column::CarId => self.car_id = field(value)?,
            Column::Category => self.category = field(value)?,
            Column::SeasonQuarter => self.season_quarter = field(value)?,
            Column::LicenceClass => self.licence_class = field(value)?,
            Column::WinnerHelmetPattern => self.winner_helmet_pattern = field(value)?,
            Column::EventType => self.event_type = field(value)?,
            Column::BestLapTime => self.best_lap_time = field(value)?,
            Column::Incidents => self.incidents = field(value)?,
            Column::ChampionshipPoints => self.championship_points = field(value)?,
            Column::SubsessionId => self.subsession_id = field(value)?,
            Column::SeasonYear => self.season_year = field(value)?,
            Column::ChampionshipPointsSort => self.championship_points_sort = field(value)?,
            Column::StartDate => self.start_date = field(value)?,
            Column::StrengthOfField => self.strength_of_field = field(value)?,
            Column::HelmetPattern => self.helmet_pattern = field(value)?,
            Column::ClubPointsSort => self.club_points_sort = field(value)?,
            Column::DisplayName => self.display_name = field(value)?,
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for SearchResultData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut row = SearchResultData::default();

        for (key, column) in COLUMNS {
            if let Some(value) = object.get(key).filter(|v| !v.is_null()) {
                row.set(column, value)
                    .map_err(|e| D::Error::custom(format!("column {} ({:?}): {}", key, column, e)))?;
            }
        }

        Ok(row)
    }
}

#[derive(Deserialize)]
struct SearchResultsResponse {
    #[serde(rename = "d")]
    data: SearchResultsPage,
}

#[derive(Deserialize)]
struct SearchResultsPage {
    #[serde(rename = "15", default)]
    count: u64,
    #[serde(rename = "r", default)]
    rows: Vec<SearchResultData>,
}

/// Bit flags describing what happened on a lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LapFlags(pub u64);

impl LapFlags {
    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn contains(&self, flags: u64) -> bool {
        self.0 & flags == flags
    }

    /// No flags set.
    pub fn is_clean(&self) -> bool {
        self.0 == 0
    }
}

/// One lap of one entrant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LapResult {
    /// Session clock at the end of the lap, as sent by the member site.
    #[serde(rename = "ses_time")]
    pub session_time: u64,
    #[serde(rename = "custid")]
    pub cust_id: u64,
    pub flags: LapFlags,
    #[serde(rename = "lap_num")]
    pub lap_number: u64,
}

#[derive(Deserialize)]
struct LapsResponse {
    #[serde(rename = "lapData", default)]
    laps: Vec<LapResult>,
}

impl Client {
    /// Fetches the full result of one subsession (a "split").
    pub async fn get_subsession_result(&self, subsession_id: u64) -> Result<SessionResult> {
        let request = ApiRequest::get(SUBSESSION_RESULTS_PATH)
            .with_query_param("subsessionID", subsession_id.to_string());
        let response = self.call(request).await?;
        Ok(response.data)
    }

    /// Searches results, returning at most the first 100 matching rows.
    ///
    /// The options are checked before anything is sent; see
    /// [`SearchResultsOptions::query`].
    pub async fn search_results(
        &self,
        options: &SearchResultsOptions,
    ) -> Result<Vec<SearchResultData>> {
        let request = ApiRequest::get(SEARCH_RESULTS_PATH).with_query_params(options.query()?);
        let response = self.call::<SearchResultsResponse>(request).await?;

        let page = response.data.data;
        tracing::debug!(
            total = page.count,
            returned = page.rows.len(),
            "Result search complete"
        );
        Ok(page.rows)
    }

    /// Fetches the laps of one entrant in one part of a subsession.
    ///
    /// `sim_session_number` selects the part of the event: 0 is the race,
    /// negative numbers are the sessions before it.
    pub async fn get_laps(
        &self,
        subsession_id: u64,
        group_id: u64,
        sim_session_number: i64,
    ) -> Result<Vec<LapResult>> {
        let request = ApiRequest::post(GET_LAPS_PATH)
            .with_query_param("subsessionid", subsession_id.to_string())
            .with_query_param("groupid", group_id.to_string())
            .with_query_param("simsesnum", sim_session_number.to_string())
            .with_body(Body::Text("a=null".to_string()));

        let response = self.call::<LapsResponse>(request).await?;
        Ok(response.data.laps)
    }
}
