/// Types for course catalog records
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Day keys in week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sun,
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
    ];

    /// Days drawn on the weekly grid.
    pub const WEEKDAYS: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn key(self) -> &'static str {
        match self {
            Day::Sun => "sun",
            Day::Mon => "mon",
            Day::Tue => "tue",
            Day::Wed => "wed",
            Day::Thu => "thu",
            Day::Fri => "fri",
            Day::Sat => "sat",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One class period. Numeric periods come before the lettered evening periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1")]
    P1,
    #[serde(rename = "2")]
    P2,
    #[serde(rename = "3")]
    P3,
    #[serde(rename = "4")]
    P4,
    #[serde(rename = "5")]
    P5,
    #[serde(rename = "6")]
    P6,
    #[serde(rename = "7")]
    P7,
    #[serde(rename = "8")]
    P8,
    #[serde(rename = "9")]
    P9,
    A,
    B,
    C,
    D,
}

impl Period {
    /// Grid order of every period label.
    pub const ALL: [Period; 13] = [
        Period::P1,
        Period::P2,
        Period::P3,
        Period::P4,
        Period::P5,
        Period::P6,
        Period::P7,
        Period::P8,
        Period::P9,
        Period::A,
        Period::B,
        Period::C,
        Period::D,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::P1 => "1",
            Period::P2 => "2",
            Period::P3 => "3",
            Period::P4 => "4",
            Period::P5 => "5",
            Period::P6 => "6",
            Period::P7 => "7",
            Period::P8 => "8",
            Period::P9 => "9",
            Period::A => "A",
            Period::B => "B",
            Period::C => "C",
            Period::D => "D",
        }
    }

    /// Looks a period up by its label.
    pub fn from_label(label: &str) -> Option<Period> {
        Period::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weekly meeting periods, one list per day. Days absent from a record are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    pub sun: Vec<Period>,
    pub mon: Vec<Period>,
    pub tue: Vec<Period>,
    pub wed: Vec<Period>,
    pub thu: Vec<Period>,
    pub fri: Vec<Period>,
    pub sat: Vec<Period>,
}

impl TimeGrid {
    pub fn slots(&self, day: Day) -> &[Period] {
        match day {
            Day::Sun => &self.sun,
            Day::Mon => &self.mon,
            Day::Tue => &self.tue,
            Day::Wed => &self.wed,
            Day::Thu => &self.thu,
            Day::Fri => &self.fri,
            Day::Sat => &self.sat,
        }
    }

    pub fn slots_mut(&mut self, day: Day) -> &mut Vec<Period> {
        match day {
            Day::Sun => &mut self.sun,
            Day::Mon => &mut self.mon,
            Day::Tue => &mut self.tue,
            Day::Wed => &mut self.wed,
            Day::Thu => &mut self.thu,
            Day::Fri => &mut self.fri,
            Day::Sat => &mut self.sat,
        }
    }

    pub fn meets(&self, day: Day, period: Period) -> bool {
        self.slots(day).contains(&period)
    }

    /// True if the course has no meeting on any day.
    pub fn is_empty(&self) -> bool {
        Day::ALL.iter().all(|&d| self.slots(d).is_empty())
    }
}

/// Bilingual label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualName {
    #[serde(default)]
    pub zh: String,
    #[serde(default)]
    pub en: String,
}

/// A classroom or teacher reference as it appears in catalog records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub link: String,
}

/// A course offering from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub name: BilingualName,
    #[serde(rename = "courseType", default)]
    pub course_type: String,
    #[serde(
        default,
        serialize_with = "serialize_credit",
        deserialize_with = "deserialize_credit"
    )]
    pub credit: f64,
    #[serde(
        default,
        serialize_with = "serialize_hours",
        deserialize_with = "deserialize_hours"
    )]
    pub hours: u32,
    #[serde(default)]
    pub time: TimeGrid,
    #[serde(default)]
    pub classroom: Vec<CatalogRef>,
    #[serde(default)]
    pub teacher: Vec<CatalogRef>,
}

/// Color bucket derived from the course type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    Blue,
    Green,
    Yellow,
    Purple,
    Neutral,
}

impl ColorCategory {
    pub fn from_course_type(tag: &str) -> Self {
        match tag {
            "▲" => ColorCategory::Blue,
            "★" => ColorCategory::Green,
            "◎" => ColorCategory::Yellow,
            "□" => ColorCategory::Purple,
            _ => ColorCategory::Neutral,
        }
    }
}

impl Course {
    pub fn color(&self) -> ColorCategory {
        ColorCategory::from_course_type(&self.course_type)
    }

    /// Teacher names in record order.
    pub fn teacher_names(&self) -> Vec<&str> {
        self.teacher.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Numeric catalog fields arrive either as strings ("3.0") or as plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Text(String),
    Number(f64),
    Null(()),
}

/// Parses a credit value. Missing, unparsable, negative and non-finite values become 0.
pub fn parse_credit(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            if !raw.trim().is_empty() {
                warn!("Unparsable credit value {:?}, using 0", raw);
            }
            0.0
        }
    }
}

/// Parses an hours value. Missing or unparsable values become 0.
pub fn parse_hours(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(v) => v,
        Err(_) => {
            if !raw.trim().is_empty() {
                warn!("Unparsable hours value {:?}, using 0", raw);
            }
            0
        }
    }
}

fn deserialize_credit<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Text(s) => parse_credit(&s),
        RawNumber::Number(n) => parse_credit(&n.to_string()),
        RawNumber::Null(()) => 0.0,
    })
}

fn deserialize_hours<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Text(s) => parse_hours(&s),
        RawNumber::Number(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => n as u32,
        RawNumber::Number(n) => {
            warn!("Unparsable hours value {}, using 0", n);
            0
        }
        RawNumber::Null(()) => 0,
    })
}

fn serialize_credit<S>(credit: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut text = credit.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    serializer.serialize_str(&text)
}

fn serialize_hours<S>(hours: &u32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hours.to_string())
}
