use std::fmt::Write;

use colored::Colorize;
use common::models::{Customer, Days};

use crate::reminders::NO_ALERTS;

/// One card per customer, or the "no data" card when there are none.
pub fn render_cards<'a, I>(customers: I) -> String
where
    I: IntoIterator<Item = &'a Customer>,
{
    let mut out = String::new();

    for customer in customers.into_iter().filter(|c| !c.is_placeholder()) {
        write_card(&mut out, customer);
    }

    if out.is_empty() {
        out.push_str(&format!(
            "{}\n  No Customers have been added yet.\n",
            "No Data Maintained".yellow().bold()
        ));
    }

    out
}

fn write_card(out: &mut String, customer: &Customer) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", customer.name.bold());
    let _ = writeln!(out, "  Phone:   {}", customer.phone);
    let _ = writeln!(out, "  Email:   {}", customer.email().unwrap_or("N/A"));
    let _ = writeln!(out, "  Address: {}", customer.address().unwrap_or("N/A"));
    let _ = writeln!(out, "  {}", "Medicines".underline());

    if customer.medicines.is_empty() {
        let _ = writeln!(out, "    • No medicines listed");
    }
    for medicine in &customer.medicines {
        let line = format!("{} ({} days left)", medicine.name, Days(medicine.days_left));
        if medicine.is_low() {
            let _ = writeln!(out, "    • {}", line.red());
        } else {
            let _ = writeln!(out, "    • {}", line);
        }
    }
    out.push('\n');
}

/// The refill alert list.
pub fn render_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        return format!("{}\n", NO_ALERTS);
    }

    messages
        .iter()
        .map(|message| format!("- {}\n", message.replace('\n', "\n  ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_shows_placeholders() {
        let customer = Customer::new("Bob Stone", "9998887770");

        let out = render_cards([&customer]);

        assert!(out.contains("Bob Stone"));
        assert!(out.contains("Phone:   9998887770"));
        assert!(out.contains("Email:   N/A"));
        assert!(out.contains("Address: N/A"));
        assert!(out.contains("No medicines listed"));
    }

    #[test]
    fn card_lists_medicines() {
        let mut customer = Customer::new("Amy Lee", "1234567890").with_medicine("Ibuprofen", 3.0);
        customer.email = Some("amy@example.com".to_string());

        let out = render_cards([&customer]);

        assert!(out.contains("Email:   amy@example.com"));
        assert!(out.contains("Ibuprofen (3 days left)"));
    }

    #[test]
    fn empty_list_renders_no_data() {
        let out = render_cards(&[Customer::default()]);

        assert!(out.contains("No Data Maintained"));
        assert!(out.contains("No Customers have been added yet."));
    }

    #[test]
    fn messages_placeholder() {
        assert_eq!(render_messages(&[]), "No medicine refill alerts.\n");
    }

    #[test]
    fn messages_are_listed() {
        let out = render_messages(&["first\nsecond".to_string()]);

        assert_eq!(out, "- first\n  second\n");
    }
}
