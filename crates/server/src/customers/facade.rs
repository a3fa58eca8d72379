//! Create/update orchestration and the lookup envelope for customers.
//!
//! `maintain_customer` runs the acceptance rules in order: existence (updates
//! only, short-circuits), field presence, tax id ownership, then the
//! name + tax id pair. Nothing is written unless every rule passes.

use std::fmt;

use clientes_core::domain::customer::{Customer, CustomerDto, CustomerId, MaintainIntent};
use clientes_core::envelope::Envelope;
use clientes_core::errors::{ApplicationError, DomainError};
use clientes_core::validation::{self, CustomerViolation, ExistingMatches};
use clientes_db::repositories::RepositoryError;
use tracing::{error, info};

use super::service::CustomerService;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaintainOutcome {
    Saved(Customer),
    Rejected(Vec<CustomerViolation>),
}

impl MaintainOutcome {
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Saved(_) => Vec::new(),
            Self::Rejected(violations) => violations.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound(CustomerId),
    Failed(String),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted => f.write_str("Customer deleted successfully!"),
            Self::NotFound(id) => write!(f, "no customer found with id: {id}"),
            Self::Failed(cause) => write!(f, "Error deleting customer: {cause}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Criterion {
    Id,
    Name,
    TaxId,
}

impl Criterion {
    fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::TaxId => "taxId",
        }
    }
}

pub fn parse_customer_id(raw: &str) -> Result<CustomerId, DomainError> {
    raw.trim().parse::<i64>().map(CustomerId).map_err(|error| DomainError::InvalidCustomerId {
        raw: raw.to_string(),
        reason: error.to_string(),
    })
}

#[derive(Clone)]
pub struct CustomerFacade {
    service: CustomerService,
}

impl CustomerFacade {
    pub fn new(service: CustomerService) -> Self {
        Self { service }
    }

    pub async fn maintain_customer(
        &self,
        candidate: Customer,
    ) -> Result<MaintainOutcome, ApplicationError> {
        let intent = candidate.intent();

        if intent == MaintainIntent::Update {
            let stored = self.service.find_by_id(candidate.id).await.map_err(persistence)?;
            if let Some(violation) = validation::check_existence(&candidate, stored.as_ref()) {
                return Ok(MaintainOutcome::Rejected(vec![violation]));
            }
        }

        let plan = validation::lookup_plan(&candidate);
        let mut matches = ExistingMatches::default();
        if let Some(prefix) = plan.tax_id_prefix {
            matches.tax_id_prefix = self
                .service
                .find_by_tax_id_prefix(prefix, candidate.id)
                .await
                .map_err(persistence)?;
        }
        if let Some((name, tax_id)) = plan.name_and_tax_id {
            matches.name_and_tax_id =
                self.service.find_by_name_and_tax_id(name, tax_id).await.map_err(persistence)?;
        }

        let violations = validation::validate_fields(&candidate, &matches);
        if !violations.is_empty() {
            info!(
                event_name = "customer.maintain.rejected",
                customer_id = %candidate.id,
                violations = violations.len(),
                "customer candidate rejected"
            );
            return Ok(MaintainOutcome::Rejected(violations));
        }

        let saved = self.service.save(candidate).await.map_err(persistence)?;
        info!(
            event_name = "customer.maintain.saved",
            customer_id = %saved.id,
            intent = ?intent,
            "customer saved"
        );
        Ok(MaintainOutcome::Saved(saved))
    }

    pub async fn delete_customer(&self, id: CustomerId) -> DeleteOutcome {
        let outcome = match self.service.find_by_id(id).await {
            Ok(None) => DeleteOutcome::NotFound(id),
            Ok(Some(_)) => match self.service.delete(id).await {
                Ok(true) => DeleteOutcome::Deleted,
                Ok(false) => DeleteOutcome::NotFound(id),
                Err(cause) => DeleteOutcome::Failed(cause.to_string()),
            },
            Err(cause) => DeleteOutcome::Failed(cause.to_string()),
        };

        if let DeleteOutcome::Failed(cause) = &outcome {
            error!(
                event_name = "customer.delete.failed",
                customer_id = %id,
                error = %cause,
                "customer delete failed"
            );
        }

        outcome
    }

    pub async fn find_by_id(&self, raw: &str) -> Result<Envelope<CustomerDto>, ApplicationError> {
        let id = parse_customer_id(raw)?;
        let found = self.service.find_by_id(id).await.map_err(persistence)?;
        Ok(lookup_envelope(found, Criterion::Id, &id.to_string()))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Envelope<CustomerDto>, ApplicationError> {
        let found = self.service.find_by_name(name).await.map_err(persistence)?;
        Ok(lookup_envelope(found, Criterion::Name, name))
    }

    pub async fn find_by_tax_id(
        &self,
        tax_id: &str,
    ) -> Result<Envelope<CustomerDto>, ApplicationError> {
        let found = self.service.find_by_tax_id(tax_id).await.map_err(persistence)?;
        Ok(lookup_envelope(found, Criterion::TaxId, tax_id))
    }

    pub async fn list_all(&self) -> Result<Vec<CustomerDto>, ApplicationError> {
        let customers = self.service.list_all().await.map_err(persistence)?;
        Ok(customers.into_iter().map(CustomerDto::from).collect())
    }

    pub async fn list_all_raw(&self) -> Result<Vec<CustomerDto>, ApplicationError> {
        let customers = self.service.list_all_raw().await.map_err(persistence)?;
        Ok(customers.into_iter().map(CustomerDto::from).collect())
    }
}

fn lookup_envelope(
    found: Option<Customer>,
    criterion: Criterion,
    value: &str,
) -> Envelope<CustomerDto> {
    match found {
        Some(customer) => Envelope::single(customer.into()),
        None => Envelope::from_errors([format!(
            "no customer found with {}: {value}",
            criterion.as_str()
        )]),
    }
}

fn persistence(error: RepositoryError) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}
