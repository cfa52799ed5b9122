use common::models::{Customer, Days, Medicine};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::prompt::Prompter;

static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Why a submission was abandoned. The display text is what the operator sees.
#[derive(Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("Error: Name field cannot be empty.")]
    EmptyName,

    #[error("Error: Name must contain only alphabets and spaces.")]
    InvalidName,

    #[error("Error: Phone number is required.")]
    MissingPhone,

    #[error("Error: Phone number must be exactly 10 digits.")]
    InvalidPhone,

    #[error("Submission cancelled.")]
    Cancelled,
}

/// The add/edit modal. Every field is raw text as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub medicines: String,
}

impl CustomerForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email().unwrap_or_default().to_string(),
            address: customer.address().unwrap_or_default().to_string(),
            medicines: encode_medicines(&customer.medicines),
        }
    }

    /// Asks for each field in turn, keeping the current value on empty input.
    pub fn fill(&mut self, prompter: &mut dyn Prompter) {
        self.name = prompter.input("Name", &self.name);
        self.phone = prompter.input("Phone", &self.phone);
        self.email = prompter.input("Email", &self.email);
        self.address = prompter.input("Address", &self.address);
        self.medicines = prompter.input("Medicines (name-days, ...)", &self.medicines);
    }

    /// Validates the form and builds the customer to send.
    ///
    /// Hard failures are alerted and rejected outright. Soft warnings ask the
    /// operator, who may carry on regardless.
    pub fn submit(&self, prompter: &mut dyn Prompter) -> Result<Customer, Rejection> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        let email = self.email.trim();
        let address = self.address.trim();
        let medicines = self.medicines.trim();

        if let Err(rejection) = check_required(name, phone) {
            prompter.alert(&rejection.to_string());
            return Err(rejection);
        }

        let warnings = [
            (
                !email.is_empty() && !EMAIL.is_match(email),
                "Warning: The email format appears invalid. Do you want to proceed?",
            ),
            (
                address.is_empty(),
                "Warning: Address is empty. Do you want to proceed without address?",
            ),
            (
                medicines.is_empty(),
                "Warning: Medicines list is empty. Do you want to proceed without medicines?",
            ),
        ];
        for (raised, warning) in warnings {
            if raised && !prompter.confirm(warning) {
                return Err(Rejection::Cancelled);
            }
        }

        Ok(Customer {
            name: name.to_string(),
            phone: phone.to_string(),
            email: non_empty(email),
            address: non_empty(address),
            medicines: parse_medicines(medicines),
        })
    }
}

fn check_required(name: &str, phone: &str) -> Result<(), Rejection> {
    if name.is_empty() {
        return Err(Rejection::EmptyName);
    }
    if !NAME.is_match(name) {
        return Err(Rejection::InvalidName);
    }
    if phone.is_empty() {
        return Err(Rejection::MissingPhone);
    }
    if !PHONE.is_match(phone) {
        return Err(Rejection::InvalidPhone);
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// `Aspirin-2,Ibuprofen-0.5`
pub fn encode_medicines(medicines: &[Medicine]) -> String {
    medicines
        .iter()
        .map(|medicine| format!("{}-{}", medicine.name, Days(medicine.days_left)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits on commas, then on the first hyphen of each entry. A day count that
/// does not start with a number is kept as unknown rather than rejected.
pub fn parse_medicines(input: &str) -> Vec<Medicine> {
    if input.is_empty() {
        return Vec::new();
    }

    input
        .split(',')
        .map(|entry| {
            let (name, days) = match entry.split_once('-') {
                Some((name, days)) => (name, parse_leading_number(days)),
                None => (entry, None),
            };
            Medicine {
                name: name.trim().to_string(),
                days_left: days,
            }
        })
        .collect()
}

/// Reads the longest numeric prefix: optional sign, digits with an optional
/// fraction, optional exponent. `"3 days"` is 3, `"soon"` is `None`.
fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digits += frac_end - (end + 1);
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}
