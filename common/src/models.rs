use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A customer and the medicines they are stocked with.
///
/// Every field defaults, and empty fields are left out, so the placeholder the
/// list endpoint returns for an empty store travels as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Customer {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String, // identifier, uniqueness is not enforced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub medicines: Vec<Medicine>,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    pub fn with_medicine(mut self, name: impl Into<String>, days_left: f64) -> Self {
        self.medicines.push(Medicine::new(name, days_left));
        self
    }

    /// True for the empty record standing in for "no data".
    pub fn is_placeholder(&self) -> bool {
        *self == Customer::default()
    }

    /// Email, treating an empty string the same as a missing one.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|address| !address.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Medicine {
    pub name: String,
    /// `None` when the day count could not be parsed.
    pub days_left: Option<f64>,
}

impl Medicine {
    pub fn new(name: impl Into<String>, days_left: f64) -> Self {
        Self {
            name: name.into(),
            days_left: Some(days_left),
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self.days_left, Some(days) if days <= 1.0)
    }
}

/// Displays a day count the way the records have always shown it:
/// `1` for whole numbers, `1.5` otherwise, `undefined` when unknown.
pub struct Days(pub Option<f64>);

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(days) => write!(f, "{}", days),
            None => write!(f, "undefined"),
        }
    }
}
