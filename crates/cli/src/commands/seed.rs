use clientes_db::{migrations, DemoCustomerDataset, SeedCustomer, VerificationResult};

use crate::commands::{open_pool, prepare, CommandFailure, CommandResult};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };

    let result: Result<Vec<SeedCustomer>, CommandFailure> = runtime.block_on(async {
        let pool = open_pool(&config).await?;

        let outcome: Result<Vec<SeedCustomer>, CommandFailure> = async {
            migrations::run_pending(&pool)
                .await
                .map_err(|error| ("migration", error.to_string(), 5u8))?;

            let seeded = DemoCustomerDataset::load(&pool)
                .await
                .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

            let verification = DemoCustomerDataset::verify(&pool)
                .await
                .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

            if verification.all_present {
                Ok(seeded.customers_seeded)
            } else {
                Err(("seed_verification", verification_message(&verification), 6u8))
            }
        }
        .await;

        pool.close().await;
        outcome
    });

    match result {
        Ok(customers) => CommandResult::success("seed", summary(&customers)),
        Err(failure) => CommandResult::from_failure("seed", failure),
    }
}

fn summary(customers: &[SeedCustomer]) -> String {
    let lines: Vec<String> = customers
        .iter()
        .map(|customer| format!("  - {}: {}", customer.tax_id, customer.name))
        .collect();
    format!("demo customer dataset loaded ({} customers):\n{}", customers.len(), lines.join("\n"))
}

fn verification_message(verification: &VerificationResult) -> String {
    let missing = verification
        .checks
        .iter()
        .filter_map(|(tax_id, present)| (!present).then_some(*tax_id))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for tax ids: {}", missing.join(", "))
    }
}
