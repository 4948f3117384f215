use crate::error::CustomerError;
use crate::model::{Customer, CustomerDto, CustomerRecord};
use crate::repository::CustomerRepository;
use chub_database::DatabaseError;
use chub_domain::config::CustomerConfig;
use chub_domain::constants::{CUSTOMER_EMAIL_INDEX, CUSTOMER_ID_INDEX};
use tracing::{info, instrument};

/// Customer use cases on top of [`CustomerRepository`].
#[derive(Debug, Clone)]
pub struct CustomerService {
    repository: CustomerRepository,
    messages: CustomerConfig,
}

impl CustomerService {
    #[must_use]
    pub const fn new(repository: CustomerRepository, messages: CustomerConfig) -> Self {
        Self { repository, messages }
    }

    /// Stores a validated customer and returns it as persisted.
    ///
    /// # Errors
    /// * [`CustomerError::Conflict`] if the id or the email is already taken, including
    ///   when a concurrent create wins the race for it.
    /// * [`CustomerError::Database`] on store failures.
    #[instrument(skip(self, customer), fields(customer_id = customer.id))]
    pub async fn save_customer(&self, customer: Customer) -> Result<Customer, CustomerError> {
        if let Some(conflict) = self.find_conflict(&customer).await? {
            return Err(conflict);
        }

        match self.repository.insert(&CustomerRecord::from(&customer)).await {
            Ok(()) => {},
            Err(DatabaseError::Duplicate { index, .. }) => {
                return Err(match index.as_str() {
                    CUSTOMER_ID_INDEX => id_taken(&customer),
                    CUSTOMER_EMAIL_INDEX => email_taken(&customer),
                    other => CustomerError::Conflict {
                        message: format!("Duplicate value for {other}").into(),
                        context: None,
                    },
                });
            },
            Err(err) => {
                // A losing concurrent transaction can abort before the index is consulted.
                if let Some(conflict) = self.find_conflict(&customer).await? {
                    return Err(conflict);
                }
                return Err(CustomerError::Database {
                    source: err,
                    context: Some("Saving customer".into()),
                });
            },
        }

        info!(name = %customer.name, "Customer saved");
        Ok(customer)
    }

    async fn find_conflict(
        &self,
        customer: &Customer,
    ) -> Result<Option<CustomerError>, CustomerError> {
        if self.repository.find_by_id(i64::from(customer.id)).await?.is_some() {
            return Ok(Some(id_taken(customer)));
        }
        if self.repository.find_by_email(&customer.email).await?.is_some() {
            return Ok(Some(email_taken(customer)));
        }
        Ok(None)
    }

    /// All customers ordered by id; empty when none are stored.
    pub async fn get_all_customers(&self) -> Result<Vec<CustomerDto>, CustomerError> {
        self.repository
            .find_all()
            .await?
            .into_iter()
            .map(to_dto)
            .collect()
    }

    pub async fn get_customer_by_id(&self, id: i32) -> Result<Option<CustomerDto>, CustomerError> {
        self.repository.find_by_id(i64::from(id)).await?.map(to_dto).transpose()
    }

    pub async fn get_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerDto>, CustomerError> {
        self.repository.find_by_email(email).await?.map(to_dto).transpose()
    }

    /// Looks up each email in order, keeping duplicates.
    ///
    /// # Errors
    /// Fails with [`CustomerError::NotFound`] on the first email without a customer.
    pub async fn get_customers_by_emails<S: AsRef<str>>(
        &self,
        emails: &[S],
    ) -> Result<Vec<CustomerDto>, CustomerError> {
        let mut customers = Vec::with_capacity(emails.len());
        for email in emails {
            let email = email.as_ref();
            let customer = self.get_customer_by_email(email).await?;
            customers.push(customer.ok_or_else(|| self.not_found(email))?);
        }
        Ok(customers)
    }

    /// Not-found error carrying the configured message and the missing key.
    pub fn not_found(&self, key: impl std::fmt::Display) -> CustomerError {
        CustomerError::NotFound {
            message: format!("{}: {key}", self.messages.not_found_message).into(),
            context: None,
        }
    }

    /// Error for an empty store, carrying the configured message.
    #[must_use]
    pub fn no_data(&self) -> CustomerError {
        CustomerError::NoData { message: self.messages.no_data_message.clone().into(), context: None }
    }
}

fn id_taken(customer: &Customer) -> CustomerError {
    CustomerError::Conflict {
        message: format!("Customer with id {} already exists", customer.id).into(),
        context: None,
    }
}

fn email_taken(customer: &Customer) -> CustomerError {
    CustomerError::Conflict {
        message: format!("Customer with email {} already exists", customer.email).into(),
        context: None,
    }
}

fn to_dto(record: CustomerRecord) -> Result<CustomerDto, CustomerError> {
    Customer::try_from(record).map(CustomerDto::from)
}
