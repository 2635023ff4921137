use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::requires;
use crate::error::{DeskError, DeskResult};
use crate::models::{new_id, Customer, DateKey, UserRole};
use crate::session::Session;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CustomerBook {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

impl CustomerBook {
    pub fn add_customer(
        &mut self,
        name: &str,
        phone: &str,
        email: &str,
        note: &str,
        last_visit: Option<DateKey>,
        session: &Session,
    ) -> DeskResult<&Customer> {
        requires(session, UserRole::Admin, "manage customer records")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::validation("customer name must not be empty"));
        }
        let customer = Customer {
            id: new_id(),
            name: name.to_string(),
            phone: phone.trim().to_string(),
            email: email.trim().to_string(),
            note: note.trim().to_string(),
            last_visit,
        };
        info!(id = %customer.id, "customer added");
        self.customers.push(customer);
        Ok(&self.customers[self.customers.len() - 1])
    }

    /// Customers whose name, phone or email contains `query`.
    pub fn search(&self, query: &str) -> Vec<&Customer> {
        let query = query.trim();
        self.customers
            .iter()
            .filter(|c| c.name.contains(query) || c.phone.contains(query) || c.email.contains(query))
            .collect()
    }
}
