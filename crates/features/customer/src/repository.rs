use crate::model::CustomerRecord;
use chub_database::{Database, DatabaseError, DatabaseErrorExt};
use chub_domain::constants::CUSTOMER_TABLE;
use tracing::{debug, instrument};

/// `SurrealDB` access for the `customer` table.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: Database,
}

impl CustomerRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stores a new row.
    ///
    /// # Errors
    /// [`DatabaseError::Duplicate`] when the id or email index already holds the value.
    #[instrument(skip(self, record), fields(customer_id = record.customer_id))]
    pub async fn insert(&self, record: &CustomerRecord) -> Result<(), DatabaseError> {
        self.db
            .query(format!(
                "CREATE {CUSTOMER_TABLE} CONTENT {{
                    customer_id: $customer_id,
                    customer_name: $customer_name,
                    email_address: $email_address
                }} RETURN NONE"
            ))
            .bind(("customer_id", record.customer_id))
            .bind(("customer_name", record.customer_name.clone()))
            .bind(("email_address", record.email_address.clone()))
            .await
            .map_err(|e| DatabaseError::from_engine(e, "Inserting customer"))?
            .check()
            .map_err(|e| DatabaseError::from_engine(surrealdb::Error::from(e), "Inserting customer"))?;

        debug!("Customer row created");
        Ok(())
    }

    /// Every stored customer, ordered by id.
    pub async fn find_all(&self) -> Result<Vec<CustomerRecord>, DatabaseError> {
        self.db
            .query(format!(
                "SELECT customer_id, customer_name, email_address FROM {CUSTOMER_TABLE}
                ORDER BY customer_id ASC"
            ))
            .await
            .context("Listing customers")?
            .take::<Vec<CustomerRecord>>(0)
            .context("Parsing customers")
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CustomerRecord>, DatabaseError> {
        self.db
            .query(format!(
                "SELECT customer_id, customer_name, email_address FROM {CUSTOMER_TABLE}
                WHERE customer_id = $customer_id LIMIT 1"
            ))
            .bind(("customer_id", id))
            .await
            .context("Loading customer by id")?
            .take::<Option<CustomerRecord>>(0)
            .context("Parsing customer")
    }

    /// Exact, case-sensitive match on the email address.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerRecord>, DatabaseError> {
        self.db
            .query(format!(
                "SELECT customer_id, customer_name, email_address FROM {CUSTOMER_TABLE}
                WHERE email_address = $email_address LIMIT 1"
            ))
            .bind(("email_address", email.to_owned()))
            .await
            .context("Loading customer by email")?
            .take::<Option<CustomerRecord>>(0)
            .context("Parsing customer")
    }
}
