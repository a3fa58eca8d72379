//! Acceptance rules for customer candidates.
//!
//! The rules never touch the store. The caller resolves the lookups named by
//! [`LookupPlan`], hands the results back as [`ExistingMatches`], and receives
//! the violations in the order they must be reported.

use thiserror::Error;

use crate::domain::customer::{Customer, CustomerId, MaintainIntent};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CustomerViolation {
    #[error("Customer not found with Id: {0}")]
    NotFound(CustomerId),
    #[error("Customer Name cannot be Empty")]
    EmptyName,
    #[error("Customer Tax-Id cannot be Empty")]
    EmptyTaxId,
    #[error("Tax-Id: {tax_id} is unique and already belongs to Customer: '{owner_name}'")]
    TaxIdTaken { tax_id: String, owner_name: String },
    #[error("A Customer with Name: '{name}' and Tax-Id: '{tax_id}' already exists")]
    NameAndTaxIdTaken { name: String, tax_id: String },
}

/// Store lookups the field rules depend on. `None` means the lookup must be skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupPlan<'a> {
    pub tax_id_prefix: Option<&'a str>,
    pub name_and_tax_id: Option<(&'a str, &'a str)>,
}

/// Records found by the lookups of a [`LookupPlan`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExistingMatches {
    pub tax_id_prefix: Option<Customer>,
    pub name_and_tax_id: Option<Customer>,
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Update candidates must point at a stored row; create candidates always pass.
pub fn check_existence(
    candidate: &Customer,
    stored: Option<&Customer>,
) -> Option<CustomerViolation> {
    match (candidate.intent(), stored) {
        (MaintainIntent::Update, None) => Some(CustomerViolation::NotFound(candidate.id)),
        _ => None,
    }
}

pub fn lookup_plan(candidate: &Customer) -> LookupPlan<'_> {
    let tax_id = (!is_blank(&candidate.tax_id)).then_some(candidate.tax_id.as_str());
    let name_and_tax_id = match tax_id {
        Some(tax_id) if !is_blank(&candidate.name) => Some((candidate.name.as_str(), tax_id)),
        _ => None,
    };

    LookupPlan { tax_id_prefix: tax_id, name_and_tax_id }
}

pub fn validate_fields(candidate: &Customer, matches: &ExistingMatches) -> Vec<CustomerViolation> {
    let mut violations = Vec::new();

    if is_blank(&candidate.name) {
        violations.push(CustomerViolation::EmptyName);
    }

    if is_blank(&candidate.tax_id) {
        violations.push(CustomerViolation::EmptyTaxId);
    } else if let Some(owner) = &matches.tax_id_prefix {
        let conflicting =
            candidate.intent() == MaintainIntent::Create || owner.id != candidate.id;
        if conflicting {
            violations.push(CustomerViolation::TaxIdTaken {
                tax_id: candidate.tax_id.clone(),
                owner_name: owner.name.clone(),
            });
        }
    }

    if let Some(existing) = &matches.name_and_tax_id {
        if existing.id != candidate.id {
            violations.push(CustomerViolation::NameAndTaxIdTaken {
                name: candidate.name.clone(),
                tax_id: candidate.tax_id.clone(),
            });
        }
    }

    violations
}
