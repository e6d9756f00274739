//! Defines the [`Entry`] data model along with the logic for loading entries
//! from the JSON data file ([`load_entries`]) and putting them in display order
//! ([`sort_entries`]).

use std::fmt;
use std::path::{Component, Path};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Number;
use tracing::{info, warn};

use crate::util::read_optional;

/// One measurement session. Only `date` and `weight` are required; every other
/// metric is optional and renders as empty text when absent.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Entry {
    /// The ISO `YYYY-MM-DD` date. This is the sort key and the name of the
    /// entry's output directory.
    pub date: String,

    /// Display-only clock time, e.g. `08:30`.
    #[serde(default)]
    pub time: Option<String>,

    /// Body weight in kilograms.
    pub weight: Number,

    #[serde(default)]
    pub bmi: Option<Number>,

    #[serde(default)]
    pub body_fat: Option<Number>,

    #[serde(default)]
    pub visceral_fat: Option<Number>,

    #[serde(default)]
    pub muscle_mass: Option<Number>,

    #[serde(default)]
    pub bmr: Option<Number>,

    #[serde(default)]
    pub protein: Option<Number>,

    #[serde(default)]
    pub body_age: Option<Number>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub food: Vec<FoodItem>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub exercise: Vec<ExerciseItem>,

    #[serde(default)]
    pub notes: Option<String>,

    /// File names of photos expected under the entry's `images/` directory.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
}

/// A single meal.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct FoodItem {
    /// The declared meal name, e.g. `早餐` or `午餐`.
    pub meal: String,
    pub desc: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub calories: Option<String>,
}

/// A single exercise session.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ExerciseItem {
    pub desc: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub calories: Option<String>,
}

impl Entry {
    /// Returns the notes only if there is something to show.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|notes| !notes.is_empty())
    }
}

// Calorie annotations are usually free text (`约500kcal`) but a bare number is
// accepted too. A numeric zero counts as no annotation.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(Number),
    }

    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        None => None,
        Some(TextOrNumber::Text(text)) => Some(text),
        Some(TextOrNumber::Number(number)) if number.as_f64() == Some(0.0) => None,
        Some(TextOrNumber::Number(number)) => Some(number.to_string()),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Loads the entries from the JSON file at `path`. The file must hold a single
/// array of entry objects. A missing file yields an empty collection since a
/// fresh tracker has no data yet; anything else that goes wrong is an error.
pub fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    let annotate = |err: Error| {
        Error::Annotated(
            format!("loading entries from `{}`", path.display()),
            Box::new(err),
        )
    };

    match read_optional(path).map_err(|err| annotate(err.into()))? {
        None => {
            warn!(path = %path.display(), "data file not found, starting empty");
            Ok(Vec::new())
        }
        Some(contents) => {
            let entries = parse_entries(&contents).map_err(annotate)?;
            info!(path = %path.display(), count = entries.len(), "loaded entries");
            Ok(entries)
        }
    }
}

/// Parses entries from a JSON document. Every entry's `date` must be usable
/// as a directory name. Dates that are not in `YYYY-MM-DD` form are logged but
/// accepted.
pub fn parse_entries(input: &str) -> Result<Vec<Entry>> {
    let entries: Vec<Entry> = serde_json::from_str(input)?;
    for (position, entry) in entries.iter().enumerate() {
        if !is_directory_name(&entry.date) {
            return Err(Error::InvalidDate {
                position,
                date: entry.date.clone(),
            });
        }
        if NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").is_err() {
            warn!(date = %entry.date, "entry date is not in YYYY-MM-DD form");
        }
    }
    Ok(entries)
}

fn is_directory_name(date: &str) -> bool {
    let mut components = Path::new(date).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == date
    )
}

/// Orders entries by date, newest first. The sort is stable, so entries that
/// share a date keep their relative input order.
pub fn sort_entries(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

/// Returns each date that appears more than once, in order of first
/// repetition.
pub fn duplicate_dates(entries: &[Entry]) -> Vec<&str> {
    use std::collections::HashSet;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for entry in entries {
        if !seen.insert(&entry.date) && !duplicates.contains(&entry.date.as_str()) {
            duplicates.push(&entry.date);
        }
    }
    duplicates
}

/// The result of loading entries.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading entries.
#[derive(Debug)]
pub enum Error {
    /// Returned when the data file exists but can't be read.
    Io(std::io::Error),

    /// Returned when the document isn't an array of entry objects, e.g. when
    /// an entry lacks `date` or `weight`.
    Malformed(serde_json::Error),

    /// Returned when an entry's date can't serve as its output directory name.
    InvalidDate { position: usize, date: String },

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Malformed(err) => write!(f, "malformed entry data: {}", err),
            Error::InvalidDate { position, date } => write!(
                f,
                "entry #{} has date {:?} which can't be used as a directory name",
                position, date
            ),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Malformed(err) => Some(err),
            Error::InvalidDate { .. } => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_json`] deserialization functions.
    fn from(err: serde_json::Error) -> Error {
        Error::Malformed(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(date: &str) -> Entry {
        parse_entries(&format!(r#"[{{"date":"{}","weight":80}}]"#, date))
            .unwrap()
            .remove(0)
    }

    fn dates(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.date.as_str()).collect()
    }

    #[test]
    fn test_parse_full_entry() -> Result<()> {
        let entries = parse_entries(
            r#"[{
                "date": "2026-02-10",
                "time": "08:30",
                "weight": 88.5,
                "bmi": 28.8,
                "bmr": 1665,
                "muscle_mass": 57.0,
                "food": [
                    {"meal": "早餐", "desc": "奶茶+三明治", "calories": "约500kcal"},
                    {"meal": "午餐", "desc": "叉烧饭", "calories": 700}
                ],
                "exercise": [{"desc": "快走30分钟"}],
                "notes": "今天感觉不错",
                "images": ["photo1.jpg"]
            }]"#,
        )?;

        assert_eq!(1, entries.len());
        let entry = &entries[0];
        assert_eq!("2026-02-10", entry.date);
        assert_eq!(Some("08:30"), entry.time.as_deref());
        assert_eq!("88.5", entry.weight.to_string());
        assert_eq!(Some("1665".to_owned()), entry.bmr.as_ref().map(Number::to_string));
        assert_eq!(
            Some("57.0".to_owned()),
            entry.muscle_mass.as_ref().map(Number::to_string)
        );
        assert_eq!(None, entry.body_fat);
        assert_eq!(
            vec![Some("约500kcal"), Some("700")],
            entry
                .food
                .iter()
                .map(|f| f.calories.as_deref())
                .collect::<Vec<_>>()
        );
        assert_eq!(None, entry.exercise[0].calories);
        assert_eq!(Some("今天感觉不错"), entry.notes());
        assert_eq!(vec!["photo1.jpg".to_owned()], entry.images);
        Ok(())
    }

    #[test]
    fn test_parse_null_optionals() -> Result<()> {
        let entries = parse_entries(
            r#"[{"date":"2026-02-10","weight":80,"bmi":null,"food":null,"notes":""}]"#,
        )?;
        assert_eq!(None, entries[0].bmi);
        assert!(entries[0].food.is_empty());
        assert_eq!(None, entries[0].notes());
        Ok(())
    }

    #[test]
    fn test_parse_zero_calories() -> Result<()> {
        let entries = parse_entries(
            r#"[{"date":"2026-02-10","weight":80,
                 "food":[{"meal":"早餐","desc":"粥","calories":0},
                         {"meal":"午餐","desc":"饭","calories":"0"}],
                 "exercise":[{"desc":"拉伸","calories":0.0}]}]"#,
        )?;
        assert_eq!(None, entries[0].food[0].calories);
        assert_eq!(Some("0"), entries[0].food[1].calories.as_deref());
        assert_eq!(None, entries[0].exercise[0].calories);
        Ok(())
    }

    #[test]
    fn test_parse_not_an_array() {
        match parse_entries(r#"{"date":"2026-02-10","weight":80}"#) {
            Err(Error::Malformed(_)) => {}
            other => panic!("wanted Error::Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_required_fields() {
        for input in &[
            r#"[{"weight":80}]"#,
            r#"[{"date":"2026-02-10"}]"#,
            r#"[{"date":"2026-02-10","weight":80,"food":[{"desc":"rice"}]}]"#,
        ] {
            match parse_entries(input) {
                Err(Error::Malformed(_)) => {}
                other => panic!("{}: wanted Error::Malformed, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_parse_rejects_path_like_dates() {
        for date in &["", "..", ".", "2026/02/10", "../escape"] {
            let input = format!(r#"[{{"date":"{}","weight":80}}]"#, date);
            match parse_entries(&input) {
                Err(Error::InvalidDate { position: 0, .. }) => {}
                other => panic!("{:?}: wanted Error::InvalidDate, got {:?}", date, other),
            }
        }
    }

    #[test]
    fn test_parse_accepts_odd_but_safe_dates() -> Result<()> {
        let entries = parse_entries(r#"[{"date":"Feb 10","weight":80}]"#)?;
        assert_eq!("Feb 10", entries[0].date);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(Vec::<Entry>::new(), load_entries(&dir.path().join("data.json"))?);
        Ok(())
    }

    #[test]
    fn test_load_malformed_file_is_annotated() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json")?;
        match load_entries(&path) {
            Err(Error::Annotated(annotation, err)) => {
                assert!(annotation.contains("data.json"));
                assert!(matches!(*err, Error::Malformed(_)));
            }
            other => panic!("wanted Error::Annotated, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_sort_entries_descending() {
        let sorted = sort_entries(vec![
            entry("2026-02-01"),
            entry("2026-02-10"),
            entry("2026-01-15"),
        ]);
        assert_eq!(vec!["2026-02-10", "2026-02-01", "2026-01-15"], dates(&sorted));
    }

    #[test]
    fn test_sort_entries_is_stable() {
        let mut first = entry("2026-02-01");
        first.notes = Some("first".to_owned());
        let mut second = entry("2026-02-01");
        second.notes = Some("second".to_owned());

        let sorted = sort_entries(vec![first, entry("2026-01-01"), second]);
        assert_eq!(vec!["2026-02-01", "2026-02-01", "2026-01-01"], dates(&sorted));
        assert_eq!(Some("first"), sorted[0].notes());
        assert_eq!(Some("second"), sorted[1].notes());
    }

    #[test]
    fn test_duplicate_dates() {
        let entries = vec![
            entry("2026-02-01"),
            entry("2026-02-02"),
            entry("2026-02-01"),
            entry("2026-02-01"),
        ];
        assert_eq!(vec!["2026-02-01"], duplicate_dates(&entries));
    }
}
