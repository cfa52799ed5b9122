use common::models::Customer;
use tracing::info;

pub const NO_ALERTS: &str = "No medicine refill alerts.";

/// One message per customer holding medicine with a day or less left, built
/// from whatever list was last fetched. Stock is not touched.
pub fn compute_reminders(customers: &[Customer]) -> Vec<String> {
    let messages: Vec<String> = customers
        .iter()
        .filter_map(|customer| {
            let low: Vec<String> = customer
                .medicines
                .iter()
                .filter_map(|medicine| match medicine.days_left {
                    Some(days) if days <= 1.0 => Some(format!(
                        "{} ({:.1} days left)",
                        medicine.name,
                        one_decimal(days)
                    )),
                    _ => None,
                })
                .collect();

            if low.is_empty() {
                return None;
            }

            Some(format!(
                "🔔 Reminder for {} ({}):\nPlease refill the following medicines:\n{}",
                customer.name,
                customer.phone,
                low.join("\n")
            ))
        })
        .collect();

    for message in &messages {
        info!("{message}");
    }

    messages
}

/// Halves round away from zero, so 0.25 shows as `0.3`.
fn one_decimal(days: f64) -> f64 {
    (days * 10.0).round() / 10.0
}
