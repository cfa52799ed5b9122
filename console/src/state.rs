use common::models::Customer;

use crate::form::CustomerForm;

/// What a validated form turns into on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(Customer),
    /// `phone` is the key the record was opened under, which the edited
    /// record may no longer carry.
    Update { phone: String, customer: Customer },
}

/// The console's copy of the customer list plus the record being edited.
#[derive(Debug, Default)]
pub struct AppState {
    customers: Vec<Customer>,
    editing: Option<String>,
}

impl AppState {
    /// Replaces the cached list with a fresh fetch. The single empty record
    /// the service sends for "no data" is dropped.
    pub fn replace(&mut self, customers: Vec<Customer>) {
        self.customers = customers
            .into_iter()
            .filter(|customer| !customer.is_placeholder())
            .collect();
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn find(&self, phone: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.phone == phone)
    }

    /// Case-insensitive match on name, plain substring match on phone.
    pub fn filter(&self, query: &str) -> Vec<&Customer> {
        let needle = query.to_lowercase();

        self.customers
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(query))
            .collect()
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn begin_add(&mut self) -> CustomerForm {
        self.editing = None;
        CustomerForm::blank()
    }

    pub fn begin_edit(&mut self, phone: &str) -> Option<CustomerForm> {
        let form = CustomerForm::from_customer(self.find(phone)?);
        self.editing = Some(phone.to_string());
        Some(form)
    }

    /// Applies a validated customer to the cached list ahead of the server and
    /// closes the modal.
    pub fn apply(&mut self, customer: Customer) -> Submission {
        match self.editing.take() {
            Some(phone) => {
                if let Some(slot) = self.customers.iter_mut().find(|c| c.phone == phone) {
                    *slot = customer.clone();
                }
                Submission::Update { phone, customer }
            }
            None => {
                self.customers.push(customer.clone());
                Submission::Create(customer)
            }
        }
    }

    /// Drops every cached record with the phone, returning how many went.
    pub fn remove(&mut self, phone: &str) -> usize {
        let before = self.customers.len();
        self.customers.retain(|c| c.phone != phone);
        before - self.customers.len()
    }
}
