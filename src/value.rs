//! Converts [`Entry`] objects into [`Value`]s for templating. See
//! [`Entry::summarize`] for the index card and [`Entry::to_value`] for the
//! detail page. All user text is escaped here, so templates print values as-is.

use std::collections::HashMap;

use gtmpl::Value;
use serde_json::Number;

use crate::entry::{Entry, ExerciseItem, FoodItem};
use crate::format::{date_label, escape_path_segment, escape_text, format_metric};

/// The label that prefixes the food summary on index cards. It is always
/// "breakfast", whatever the first item's declared meal is.
pub const FOOD_SUMMARY_LABEL: &str = "早餐：";

/// A single metric slot: a label, the formatted value (possibly empty) and a
/// unit suffix (possibly empty).
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Metric {
    fn new(label: &'static str, value: Option<&Number>, unit: &'static str) -> Metric {
        Metric {
            label,
            value: format_metric(value),
            unit,
        }
    }
}

impl From<&Metric> for Value {
    fn from(metric: &Metric) -> Value {
        object(vec![
            ("label", Value::String(metric.label.to_owned())),
            ("value", Value::String(metric.value.clone())),
            ("unit", Value::String(metric.unit.to_owned())),
            ("has_unit", Value::Bool(!metric.unit.is_empty())),
        ])
    }
}

impl From<&FoodItem> for Value {
    fn from(item: &FoodItem) -> Value {
        object(vec![
            ("meal", Value::String(escape_text(&item.meal))),
            ("desc", Value::String(escape_text(&item.desc))),
            calories(&item.calories),
            has_calories(&item.calories),
        ])
    }
}

impl From<&ExerciseItem> for Value {
    fn from(item: &ExerciseItem) -> Value {
        object(vec![
            ("desc", Value::String(escape_text(&item.desc))),
            calories(&item.calories),
            has_calories(&item.calories),
        ])
    }
}

impl Entry {
    /// The four headline metrics shown on index cards.
    pub fn headline_metrics(&self) -> [Metric; 4] {
        [
            Metric::new("体重", Some(&self.weight), " kg"),
            Metric::new("BMI", self.bmi.as_ref(), ""),
            Metric::new("体脂率", self.body_fat.as_ref(), "%"),
            Metric::new("内脏脂肪", self.visceral_fat.as_ref(), ""),
        ]
    }

    /// The eight metric slots shown on the detail page, in display order.
    /// Every slot is present whether or not the entry has a value for it.
    pub fn detail_metrics(&self) -> [Metric; 8] {
        [
            Metric::new("体重", Some(&self.weight), " kg"),
            Metric::new("BMI", self.bmi.as_ref(), ""),
            Metric::new("体脂率", self.body_fat.as_ref(), "%"),
            Metric::new("内脏脂肪", self.visceral_fat.as_ref(), "级"),
            Metric::new("肌肉量", self.muscle_mass.as_ref(), " kg"),
            Metric::new("基础代谢", self.bmr.as_ref(), " kcal"),
            Metric::new("蛋白质", self.protein.as_ref(), " kg"),
            Metric::new("身体年龄", self.body_age.as_ref(), " 岁"),
        ]
    }

    /// The food line for index cards, built from the first food item only.
    pub fn food_summary(&self) -> Option<String> {
        self.food
            .first()
            .map(|item| format!("{}{}", FOOD_SUMMARY_LABEL, item.desc))
    }

    /// The exercise line for index cards, built from the first exercise item
    /// only.
    pub fn exercise_summary(&self) -> Option<&str> {
        self.exercise.first().map(|item| item.desc.as_str())
    }

    /// Converts the entry into the [`Value`] for its index card. The result is
    /// a [`Value::Object`] with fields `date`, `time`, `href`, `metrics`,
    /// `has_food`, `food_summary`, `has_exercise` and `exercise_summary`.
    pub fn summarize(&self) -> Value {
        let food_summary = self.food_summary();
        let exercise_summary = self.exercise_summary();
        object(vec![
            ("date", Value::String(escape_text(&self.date))),
            ("time", Value::String(self.escaped_time())),
            ("href", Value::String(format!("{}/", escape_path_segment(&self.date)))),
            ("metrics", metrics(&self.headline_metrics())),
            ("has_food", Value::Bool(food_summary.is_some())),
            (
                "food_summary",
                Value::String(escape_text(food_summary.as_deref().unwrap_or_default())),
            ),
            ("has_exercise", Value::Bool(exercise_summary.is_some())),
            (
                "exercise_summary",
                Value::String(escape_text(exercise_summary.unwrap_or_default())),
            ),
        ])
    }

    /// Converts the entry into the [`Value`] for its detail page. Sections
    /// are flagged with `has_food`, `has_exercise`, `has_notes` and
    /// `has_images` so the template can drop a whole block when its data is
    /// absent.
    pub fn to_value(&self) -> Value {
        let notes = self.notes();
        object(vec![
            ("date", Value::String(escape_text(&self.date))),
            ("date_label", Value::String(escape_text(&date_label(&self.date)))),
            ("time", Value::String(self.escaped_time())),
            ("metrics", metrics(&self.detail_metrics())),
            ("has_food", Value::Bool(!self.food.is_empty())),
            ("food", Value::Array(self.food.iter().map(Value::from).collect())),
            ("has_exercise", Value::Bool(!self.exercise.is_empty())),
            (
                "exercise",
                Value::Array(self.exercise.iter().map(Value::from).collect()),
            ),
            ("has_notes", Value::Bool(notes.is_some())),
            ("notes", Value::String(escape_text(notes.unwrap_or_default()))),
            ("has_images", Value::Bool(!self.images.is_empty())),
            (
                "images",
                Value::Array(self.images.iter().map(|name| image(name)).collect()),
            ),
        ])
    }

    fn escaped_time(&self) -> String {
        escape_text(self.time.as_deref().unwrap_or_default())
    }
}

fn object(fields: Vec<(&str, Value)>) -> Value {
    let m: HashMap<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect();
    Value::Object(m)
}

fn metrics(metrics: &[Metric]) -> Value {
    Value::Array(metrics.iter().map(Value::from).collect())
}

// Image references resolve against the `images/` directory next to the page.
fn image(name: &str) -> Value {
    object(vec![
        ("src", Value::String(escape_path_segment(name))),
        ("alt", Value::String(escape_text(name))),
    ])
}

fn calories(calories: &Option<String>) -> (&'static str, Value) {
    (
        "calories",
        Value::String(escape_text(calories.as_deref().unwrap_or_default())),
    )
}

fn has_calories(calories: &Option<String>) -> (&'static str, Value) {
    (
        "has_calories",
        Value::Bool(calories.as_deref().map_or(false, |c| !c.is_empty())),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::parse_entries;
    use pretty_assertions::assert_eq;

    fn entry(json: &str) -> Entry {
        parse_entries(&format!("[{}]", json)).unwrap().remove(0)
    }

    fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
        match value {
            Value::Object(m) => &m[key],
            _ => panic!("not an object: {:?}", value),
        }
    }

    fn string(value: &Value) -> &str {
        match value {
            Value::String(s) => s,
            _ => panic!("not a string: {:?}", value),
        }
    }

    #[test]
    fn test_detail_metrics_keep_every_slot() {
        let e = entry(r#"{"date":"2026-02-10","weight":88.5,"bmr":1665}"#);
        let metrics = e.detail_metrics();
        assert_eq!(
            vec!["88.5", "", "", "", "", "1665", "", ""],
            metrics.iter().map(|m| m.value.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(
            vec![" kg", "", "%", "级", " kg", " kcal", " kg", " 岁"],
            metrics.iter().map(|m| m.unit).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_food_summary_always_reads_breakfast() {
        let e = entry(
            r#"{"date":"2026-02-10","weight":80,
                "food":[{"meal":"晚餐","desc":"火锅"},{"meal":"夜宵","desc":"烧烤"}]}"#,
        );
        assert_eq!(Some("早餐：火锅".to_owned()), e.food_summary());
    }

    #[test]
    fn test_summaries_absent_without_items() {
        let e = entry(r#"{"date":"2026-02-10","weight":80}"#);
        assert_eq!(None, e.food_summary());
        assert_eq!(None, e.exercise_summary());
    }

    #[test]
    fn test_summarize_escapes_user_text() {
        let e = entry(
            r#"{"date":"2026-02-10","weight":80,
                "exercise":[{"desc":"<script>run</script>"}]}"#,
        );
        let value = e.summarize();
        assert_eq!(
            "&lt;script&gt;run&lt;/script&gt;",
            string(field(&value, "exercise_summary"))
        );
        assert_eq!("2026-02-10/", string(field(&value, "href")));
    }

    #[test]
    fn test_to_value_flags_sections() {
        let e = entry(r#"{"date":"2026-02-10","weight":80,"notes":"ok","images":["a b.jpg"]}"#);
        let value = e.to_value();
        assert!(matches!(field(&value, "has_food"), Value::Bool(false)));
        assert!(matches!(field(&value, "has_exercise"), Value::Bool(false)));
        assert!(matches!(field(&value, "has_notes"), Value::Bool(true)));
        assert!(matches!(field(&value, "has_images"), Value::Bool(true)));
        assert_eq!("2026年02月10日", string(field(&value, "date_label")));
        match field(&value, "images") {
            Value::Array(images) => {
                assert_eq!("a%20b.jpg", string(field(&images[0], "src")));
                assert_eq!("a b.jpg", string(field(&images[0], "alt")));
            }
            other => panic!("not an array: {:?}", other),
        }
    }
}
