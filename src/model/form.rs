//! Editable form state shared by every add/edit panel
//!
//! Values are kept as the raw text the user typed; typed getters parse on
//! read. Numbers accept a leading numeric prefix ("12.5t" reads as 12.5) and
//! fall back to 0, dates fall back to the supplied "today".

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static DECIMAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid decimal regex")
});

static INTEGER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("valid integer regex"));

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder shown for an unset optional choice
pub const NONE_CHOICE: &str = "—";

/// Parse the leading decimal number of `input`, 0 when there is none
pub fn parse_decimal(input: &str) -> f64 {
    DECIMAL_PREFIX
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse the leading integer of `input`, 0 when there is none
pub fn parse_integer(input: &str) -> i64 {
    INTEGER_PREFIX
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}

pub fn parse_date(input: &str, today: NaiveDate) -> NaiveDate {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).unwrap_or(today)
}

/// Empty input means "no date"
pub fn parse_optional_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    if input.trim().is_empty() {
        None
    } else {
        Some(parse_date(input, today))
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Decimal,
    Integer,
    Date,
    OptionalDate,
    /// Fixed option list, cycled with ←/→
    Choice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
}

impl Field {
    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }
}

/// A titled list of fields with one focused field
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub title: String,
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            focus: 0,
        }
    }

    fn field(mut self, key: &'static str, label: &str, kind: FieldKind, value: String) -> Self {
        self.fields.push(Field {
            key,
            label: label.to_string(),
            kind,
            value,
        });
        self
    }

    // ─── Builders ────────────────────────────────────────────────────────────

    pub fn text(self, key: &'static str, label: &str, value: &str) -> Self {
        self.field(key, label, FieldKind::Text, value.to_string())
    }

    pub fn decimal(self, key: &'static str, label: &str, value: f64) -> Self {
        self.field(key, label, FieldKind::Decimal, value.to_string())
    }

    pub fn integer(self, key: &'static str, label: &str, value: i64) -> Self {
        self.field(key, label, FieldKind::Integer, value.to_string())
    }

    pub fn date(self, key: &'static str, label: &str, value: NaiveDate) -> Self {
        self.field(key, label, FieldKind::Date, format_date(value))
    }

    pub fn optional_date(self, key: &'static str, label: &str, value: Option<NaiveDate>) -> Self {
        let text = value.map(format_date).unwrap_or_default();
        self.field(key, label, FieldKind::OptionalDate, text)
    }

    /// A choice field; `selected` falls back to the first option when absent
    pub fn choice(self, key: &'static str, label: &str, options: Vec<String>, selected: &str) -> Self {
        let value = if options.iter().any(|o| o == selected) {
            selected.to_string()
        } else {
            options.first().cloned().unwrap_or_default()
        };
        self.field(key, label, FieldKind::Choice(options), value)
    }

    // ─── Editing ─────────────────────────────────────────────────────────────

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    /// Type a character into the focused field; ignored on choice fields
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !field.is_choice() {
                field.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !field.is_choice() {
                field.value.pop();
            }
        }
    }

    /// Move the focused choice field to its next (or previous) option
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let FieldKind::Choice(options) = &field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| *o == field.value).unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            current.checked_sub(1).unwrap_or(options.len() - 1)
        };
        field.value = options[next].clone();
    }

    // ─── Typed getters ───────────────────────────────────────────────────────

    /// Raw value of a field; empty for unknown keys
    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn string(&self, key: &str) -> String {
        self.value(key).trim().to_string()
    }

    pub fn get_decimal(&self, key: &str) -> f64 {
        parse_decimal(self.value(key))
    }

    pub fn get_integer(&self, key: &str) -> i64 {
        parse_integer(self.value(key))
    }

    pub fn get_date(&self, key: &str, today: NaiveDate) -> NaiveDate {
        parse_date(self.value(key), today)
    }

    pub fn get_optional_date(&self, key: &str, today: NaiveDate) -> Option<NaiveDate> {
        parse_optional_date(self.value(key), today)
    }

    /// Choice value, `None` for the placeholder option
    pub fn get_choice(&self, key: &str) -> Option<&str> {
        match self.value(key) {
            "" | NONE_CHOICE => None,
            value => Some(value),
        }
    }

    #[cfg(test)]
    /// Overwrite a field's raw text
    #[cfg(test)]
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_parse_decimal_accepts_leading_prefix() {
        assert_eq!(parse_decimal("12.5"), 12.5);
        assert_eq!(parse_decimal("  42 tons"), 42.0);
        assert_eq!(parse_decimal("-3.5e2x"), -350.0);
        assert_eq!(parse_decimal(".5"), 0.5);
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal(""), 0.0);
    }

    #[test]
    fn test_parse_integer_accepts_leading_prefix() {
        assert_eq!(parse_integer("2019"), 2019);
        assert_eq!(parse_integer("2019.9"), 2019);
        assert_eq!(parse_integer("built 2019"), 0);
    }

    #[test]
    fn test_dates_fall_back_to_today() {
        assert_eq!(parse_date("2024-02-29", today()), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(parse_date("yesterday", today()), today());
        assert_eq!(parse_optional_date("   ", today()), None);
        assert_eq!(parse_optional_date("nope", today()), Some(today()));
    }

    #[test]
    fn test_form_focus_wraps_and_choice_cycles() {
        let mut form = Form::new("Fuel")
            .text("port", "Port", "")
            .choice("fuel", "Fuel", vec!["A".into(), "B".into()], "B");

        form.focus_prev();
        assert_eq!(form.focused().unwrap().key, "fuel");
        form.input('x');
        assert_eq!(form.value("fuel"), "B");
        form.cycle(true);
        assert_eq!(form.value("fuel"), "A");
        form.cycle(false);
        assert_eq!(form.value("fuel"), "B");

        form.focus_next();
        form.input('D');
        form.input('N');
        form.backspace();
        assert_eq!(form.string("port"), "D");
    }

    #[test]
    fn test_choice_placeholder_reads_as_none() {
        let form = Form::new("Cost").choice(
            "trip",
            "Trip",
            vec![NONE_CHOICE.to_string(), "#1 Spring".to_string()],
            "missing",
        );
        assert_eq!(form.get_choice("trip"), None);
    }
}
