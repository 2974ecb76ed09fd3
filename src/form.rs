use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::trip::{Days, TripRequest, TripType, UnknownTripType};

pub const DESTINATION_ERROR: &str = "destination must not be empty";
pub const BUDGET_ERROR: &str = "budget must be a number greater than zero";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Destination,
    Days,
    TripType,
    Interests,
    Budget,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Destination,
        Field::Days,
        Field::TripType,
        Field::Interests,
        Field::Budget,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Destination => "destination",
            Field::Days => "days",
            Field::TripType => "tripType",
            Field::Interests => "interests",
            Field::Budget => "budget",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw field value as the view hands it over: text input or slider position.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Range(u8),
}

impl FieldValue {
    fn text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Range(n) => n.to_string(),
        }
    }

    fn days(&self) -> Option<Days> {
        match self {
            FieldValue::Range(n) => Some(Days::clamped(*n)),
            FieldValue::Text(s) => s.trim().parse::<i64>().ok().map(Days::saturating),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<u8> for FieldValue {
    fn from(n: u8) -> Self {
        FieldValue::Range(n)
    }
}

/// Every field of the form, always populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    pub destination: String,
    pub days: Days,
    pub trip_type: String,
    pub interests: String,
    pub budget: String,
}

impl FieldSet {
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::Destination => FieldValue::Text(self.destination.clone()),
            Field::Days => FieldValue::Range(self.days.get()),
            Field::TripType => FieldValue::Text(self.trip_type.clone()),
            Field::Interests => FieldValue::Text(self.interests.clone()),
            Field::Budget => FieldValue::Text(self.budget.clone()),
        }
    }

    fn store(&mut self, field: Field, value: &FieldValue) {
        match field {
            Field::Destination => self.destination = value.text(),
            // an unparseable day count leaves the slider where it was
            Field::Days => {
                if let Some(days) = value.days() {
                    self.days = days;
                }
            }
            Field::TripType => self.trip_type = value.text(),
            Field::Interests => self.interests = value.text(),
            Field::Budget => self.budget = value.text(),
        }
    }
}

/// Field name to error message. A field is valid iff its entry is absent or empty.
pub type ErrorMap = BTreeMap<Field, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Untouched,
    Valid,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitBlocked {
    #[error("form has invalid fields")]
    Invalid(ErrorMap),
    #[error(transparent)]
    TripType(#[from] UnknownTripType),
}

/// Validation rule for a single field. Returns the error message, if any.
pub fn validate(field: Field, value: &FieldValue) -> Option<&'static str> {
    match field {
        Field::Destination => {
            if value.text().trim().is_empty() {
                Some(DESTINATION_ERROR)
            } else {
                None
            }
        }
        Field::Budget => match parse_budget(&value.text()) {
            Some(_) => None,
            None => Some(BUDGET_ERROR),
        },
        Field::Days | Field::TripType | Field::Interests => None,
    }
}

fn parse_budget(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|b| b.is_finite() && *b > 0.0)
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    fields: FieldSet,
    errors: ErrorMap,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn status(&self, field: Field) -> FieldStatus {
        match self.errors.get(&field) {
            None => FieldStatus::Untouched,
            Some(e) if e.is_empty() => FieldStatus::Valid,
            Some(e) => FieldStatus::Invalid(e.clone()),
        }
    }

    /// Stores `value` and re-validates that field only.
    pub fn set_field(&mut self, field: Field, value: impl Into<FieldValue>) {
        let value = value.into();
        self.fields.store(field, &value);
        self.record(field, validate(field, &value));
    }

    /// True iff no field currently carries an error. Untouched fields count as valid.
    pub fn is_submittable(&self) -> bool {
        self.errors.values().all(String::is_empty)
    }

    /// Re-runs every rule over the current values, regardless of what was touched.
    pub fn validate_all(&mut self) -> bool {
        for field in Field::ALL {
            let value = self.fields.get(field);
            self.record(field, validate(field, &value));
        }
        self.is_submittable()
    }

    /// Full revalidation followed by snapshotting the fields into a request.
    pub fn to_request(&mut self) -> Result<TripRequest, SubmitBlocked> {
        if !self.validate_all() {
            let invalid = self
                .errors
                .iter()
                .filter(|(_, e)| !e.is_empty())
                .map(|(f, e)| (*f, e.clone()))
                .collect();
            return Err(SubmitBlocked::Invalid(invalid));
        }

        let trip_type = match self.fields.trip_type.trim() {
            "" => None,
            raw => Some(raw.parse::<TripType>()?),
        };
        let budget = parse_budget(&self.fields.budget).ok_or_else(|| {
            SubmitBlocked::Invalid(ErrorMap::from([(Field::Budget, BUDGET_ERROR.to_string())]))
        })?;

        Ok(TripRequest {
            destination: self.fields.destination.clone(),
            days: self.fields.days,
            trip_type,
            interests: self.fields.interests.clone(),
            budget,
        })
    }

    fn record(&mut self, field: Field, error: Option<&str>) {
        self.errors
            .insert(field, error.unwrap_or_default().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unvalidated_fields_never_error() {
        for field in [Field::Days, Field::TripType, Field::Interests] {
            for value in ["", "   ", "abc", "-1", "9999"] {
                assert_eq!(validate(field, &value.into()), None, "{field} / {value:?}");
            }
            assert_eq!(validate(field, &FieldValue::Range(0)), None);
        }
    }

    #[test]
    fn test_destination_rule() {
        assert_eq!(validate(Field::Destination, &"".into()), Some(DESTINATION_ERROR));
        assert_eq!(validate(Field::Destination, &"   ".into()), Some(DESTINATION_ERROR));
        assert_eq!(validate(Field::Destination, &"Paris".into()), None);
    }

    #[test]
    fn test_budget_rule() {
        for bad in ["0", "-5", "abc", "", "NaN", "inf"] {
            assert_eq!(validate(Field::Budget, &bad.into()), Some(BUDGET_ERROR), "{bad:?}");
        }
        for good in ["100", " 250.5 ", "1e3"] {
            assert_eq!(validate(Field::Budget, &good.into()), None, "{good:?}");
        }
    }

    #[test]
    fn test_submittability_recovers() {
        let mut form = FormState::new();
        assert!(form.is_submittable());

        form.set_field(Field::Destination, "");
        assert!(!form.is_submittable());
        assert_eq!(form.status(Field::Destination), FieldStatus::Invalid(DESTINATION_ERROR.to_string()));

        form.set_field(Field::Destination, "Lisbon");
        assert!(form.is_submittable());
        assert_eq!(form.status(Field::Destination), FieldStatus::Valid);
    }

    #[test]
    fn test_set_field_only_touches_its_entry() {
        let mut form = FormState::new();
        form.set_field(Field::Budget, "abc");
        form.set_field(Field::Destination, "Rome");

        assert_eq!(form.status(Field::Budget), FieldStatus::Invalid(BUDGET_ERROR.to_string()));
        assert_eq!(form.status(Field::Interests), FieldStatus::Untouched);
        assert_eq!(form.fields().budget, "abc");
    }

    #[test]
    fn test_days_stay_in_range() {
        let mut form = FormState::new();
        form.set_field(Field::Days, 45u8);
        assert_eq!(form.fields().days.get(), 30);

        form.set_field(Field::Days, "nope");
        assert_eq!(form.fields().days.get(), 30);
    }

    #[test]
    fn test_days_text_out_of_range_is_clamped() {
        let mut form = FormState::new();
        form.set_field(Field::Days, "300");
        assert_eq!(form.fields().days.get(), 30);

        form.set_field(Field::Days, " -4 ");
        assert_eq!(form.fields().days.get(), 1);

        form.set_field(Field::Days, "12");
        assert_eq!(form.fields().days.get(), 12);
    }

    #[test]
    fn test_untouched_required_field_caught_at_submit() {
        let mut form = FormState::new();
        form.set_field(Field::Budget, "500");
        assert!(form.is_submittable());

        match form.to_request() {
            Err(SubmitBlocked::Invalid(errors)) => {
                assert_eq!(errors.get(&Field::Destination).map(String::as_str), Some(DESTINATION_ERROR));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(!form.is_submittable());
    }

    #[test]
    fn test_to_request_snapshot() {
        let mut form = FormState::new();
        form.set_field(Field::Destination, "Tokyo");
        form.set_field(Field::Days, 5u8);
        form.set_field(Field::TripType, "cultural");
        form.set_field(Field::Interests, "temples");
        form.set_field(Field::Budget, "500");

        let request = form.to_request().unwrap();
        assert_eq!(request.destination, "Tokyo");
        assert_eq!(request.days.get(), 5);
        assert_eq!(request.trip_type, Some(TripType::Cultural));
        assert_eq!(request.interests, "temples");
        assert_eq!(request.budget, 500.0);
    }

    #[test]
    fn test_to_request_rejects_unknown_trip_type() {
        let mut form = FormState::new();
        form.set_field(Field::Destination, "Oslo");
        form.set_field(Field::Budget, "800");
        form.set_field(Field::TripType, "cruise");

        assert!(matches!(form.to_request(), Err(SubmitBlocked::TripType(_))));
    }
}
