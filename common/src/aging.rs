//! Twice-daily ageing of medicine stock.
//!
//! Every positive day count drops by [`AGING_STEP`], never below zero. Any
//! medicine left at one day or less afterwards produces a [`Reminder`].

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    models::{Customer, Days},
    notify::Notifier,
    store::Records,
};

pub const AGING_STEP: f64 = 0.5;
pub const DEFAULT_SIGNATURE: &str = "Knox Medicals";

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub phone: String,
    pub medicine: String,
    pub days_left: f64,
}

impl Reminder {
    pub fn message(&self, signature: &str) -> String {
        let remaining = if self.days_left == 0.0 {
            "no".to_string()
        } else {
            Days(Some(self.days_left)).to_string()
        };

        format!(
            "Reminder: Only {} day(s) of {} left. Please refill. — {}",
            remaining, self.medicine, signature
        )
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct AgingReport {
    pub decremented: usize,
    pub reminders: Vec<Reminder>,
}

impl AgingReport {
    pub fn changed(&self) -> bool {
        self.decremented > 0
    }
}

/// Applies one ageing step to every medicine of every customer.
pub fn age_medicines(customers: &mut [Customer]) -> AgingReport {
    let mut report = AgingReport::default();

    for customer in customers.iter_mut() {
        for medicine in customer.medicines.iter_mut() {
            let Some(days) = medicine.days_left else {
                continue;
            };

            let days = if days > 0.0 {
                let aged = (days - AGING_STEP).max(0.0);
                medicine.days_left = Some(aged);
                report.decremented += 1;
                aged
            } else {
                days
            };

            if days <= 1.0 {
                report.reminders.push(Reminder {
                    phone: customer.phone.clone(),
                    medicine: medicine.name.clone(),
                    days_left: days,
                });
            }
        }
    }

    report
}

pub struct AgingJob {
    records: Arc<Records>,
    notifier: Arc<dyn Notifier>,
    signature: String,
}

impl AgingJob {
    pub fn new(records: Arc<Records>, notifier: Arc<dyn Notifier>, signature: String) -> Self {
        Self {
            records,
            notifier,
            signature,
        }
    }

    /// Runs one pass over the store. Failures are logged and the pass is
    /// abandoned; the next scheduled run starts from scratch.
    pub async fn tick(&self) -> Option<AgingReport> {
        let result = self
            .records
            .transact(|customers| {
                let report = age_medicines(customers);
                for reminder in &report.reminders {
                    self.notifier
                        .notify(reminder, &reminder.message(&self.signature));
                }
                let changed = report.changed();
                Ok((report, changed))
            })
            .await;

        match result {
            Ok(report) => {
                if report.changed() {
                    info!("Medicine timers updated and saved.");
                }
                Some(report)
            }
            Err(err) => {
                error!("Failed to age medicine stock: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;
    use crate::{models::Medicine, store::JsonFileStore};

    #[derive(Default)]
    struct CollectingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for CollectingNotifier {
        fn notify(&self, _reminder: &Reminder, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn amy() -> Customer {
        Customer::new("Amy Lee", "1234567890").with_medicine("Aspirin", 1.0)
    }

    async fn job_with(
        customers: &[Customer],
    ) -> (TempDir, Arc<Records>, Arc<CollectingNotifier>, AgingJob) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("users.json"));
        store.save(customers).await.unwrap();
        let records = Arc::new(Records::new(store));
        let notifier = Arc::new(CollectingNotifier::default());
        let job = AgingJob::new(
            records.clone(),
            notifier.clone(),
            DEFAULT_SIGNATURE.to_string(),
        );
        (dir, records, notifier, job)
    }

    #[test]
    fn two_days_becomes_one_and_a_half() {
        let mut customers =
            vec![Customer::new("Amy Lee", "1234567890").with_medicine("Aspirin", 2.0)];

        let report = age_medicines(&mut customers);

        assert_eq!(customers[0].medicines[0].days_left, Some(1.5));
        assert!(report.changed());
        assert!(report.reminders.is_empty());
    }

    #[test]
    fn never_drops_below_zero() {
        let mut customers =
            vec![Customer::new("Amy Lee", "1234567890").with_medicine("Aspirin", 0.3)];

        for _ in 0..5 {
            age_medicines(&mut customers);
        }

        assert_eq!(customers[0].medicines[0].days_left, Some(0.0));
    }

    #[test]
    fn zero_stays_zero_but_still_reminds() {
        let mut customers =
            vec![Customer::new("Amy Lee", "1234567890").with_medicine("Aspirin", 0.0)];

        let report = age_medicines(&mut customers);

        assert_eq!(customers[0].medicines[0].days_left, Some(0.0));
        assert!(!report.changed());
        assert_eq!(report.reminders.len(), 1);
        assert_eq!(
            report.reminders[0].message("Knox Medicals"),
            "Reminder: Only no day(s) of Aspirin left. Please refill. — Knox Medicals"
        );
    }

    #[test]
    fn unknown_day_count_is_skipped() {
        let mut customers = vec![Customer {
            medicines: vec![Medicine {
                name: "Mystery".to_string(),
                days_left: None,
            }],
            ..Customer::new("Amy Lee", "1234567890")
        }];

        let report = age_medicines(&mut customers);

        assert_eq!(report, AgingReport::default());
        assert_eq!(customers[0].medicines[0].days_left, None);
    }

    #[test]
    fn low_stock_message_uses_day_count() {
        let reminder = Reminder {
            phone: "1234567890".to_string(),
            medicine: "Aspirin".to_string(),
            days_left: 0.5,
        };

        assert_eq!(
            reminder.message("Knox Medicals"),
            "Reminder: Only 0.5 day(s) of Aspirin left. Please refill. — Knox Medicals"
        );
    }

    #[tokio::test]
    async fn tick_persists_and_notifies() {
        let (_dir, records, notifier, job) = job_with(&[amy()]).await;

        let report = job.tick().await.unwrap();

        assert_eq!(report.decremented, 1);
        let stored = records.store().load().await.unwrap();
        assert_eq!(stored[0].medicines[0].days_left, Some(0.5));
        assert!(stored[0].medicines[0].is_low());
        assert_eq!(
            *notifier.messages.lock().unwrap(),
            vec!["Reminder: Only 0.5 day(s) of Aspirin left. Please refill. — Knox Medicals"]
        );
    }

    #[tokio::test]
    async fn tick_without_change_leaves_file_untouched() {
        let customers = [Customer::new("Bob Stone", "9998887770")];
        let (_dir, records, _notifier, job) = job_with(&customers).await;
        let compact = r#"[{"name":"Bob Stone","phone":"9998887770"}]"#;
        std::fs::write(records.store().path(), compact).unwrap();

        let report = job.tick().await.unwrap();

        assert!(!report.changed());
        let raw = std::fs::read_to_string(records.store().path()).unwrap();
        assert_eq!(raw, compact);
    }

    #[tokio::test]
    async fn tick_on_corrupt_store_is_abandoned() {
        let (_dir, records, notifier, job) = job_with(&[amy()]).await;
        std::fs::write(records.store().path(), "not json").unwrap();

        assert!(job.tick().await.is_none());
        assert!(notifier.messages.lock().unwrap().is_empty());

        records.store().save(&[amy()]).await.unwrap();
        assert!(job.tick().await.is_some());
    }
}
