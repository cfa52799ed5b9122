use tracing::error;

use crate::{
    api::ApiClient,
    form::CustomerForm,
    prompt::Prompter,
    reminders::compute_reminders,
    state::{AppState, Submission},
};

/// Ties the cached state, the service and the operator together.
pub struct Console<P> {
    api: ApiClient,
    state: AppState,
    prompter: P,
}

impl<P: Prompter> Console<P> {
    pub fn new(api: ApiClient, prompter: P) -> Self {
        Self {
            api,
            state: AppState::default(),
            prompter,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn prompter(&mut self) -> &mut P {
        &mut self.prompter
    }

    /// Fetches the list and recomputes the refill reminders from it. A failed
    /// fetch keeps the previous cache.
    pub async fn load(&mut self) -> Vec<String> {
        match self.api.list().await {
            Ok(customers) => self.state.replace(customers),
            Err(e) => error!("Failed to load users: {e:#}"),
        }

        compute_reminders(self.state.customers())
    }

    /// Validates the form, applies it locally and sends it. Returns whether
    /// the service accepted it.
    pub async fn submit(&mut self, form: &CustomerForm) -> bool {
        let customer = match form.submit(&mut self.prompter) {
            Ok(customer) => customer,
            Err(_) => return false,
        };

        let (result, failure) = match self.state.apply(customer) {
            Submission::Create(customer) => (
                self.api.create(&customer).await,
                "An error occurred while saving user data.",
            ),
            Submission::Update { phone, customer } => (
                self.api.update(&phone, &customer).await,
                "An error occurred while updating user data.",
            ),
        };

        self.report(result, failure)
    }

    /// Asks first, then drops the record locally before the service confirms.
    pub async fn delete(&mut self, phone: &str) -> bool {
        let Some(customer) = self.state.find(phone) else {
            self.prompter.alert(&format!("No customer with phone {phone}."));
            return false;
        };

        let question = format!("Are you sure you want to delete user: {}?", customer.name);
        if !self.prompter.confirm(&question) {
            return false;
        }

        self.state.remove(phone);
        let result = self.api.delete(phone).await;
        self.report(result, "An error occurred while deleting user data.")
    }

    fn report(&mut self, result: anyhow::Result<()>, failure: &str) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Error: {e:#}");
                self.prompter.alert(failure);
                false
            }
        }
    }
}
