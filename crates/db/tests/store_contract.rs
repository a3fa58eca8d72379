//! Both customer stores must answer the same lookups the same way.

use clientes_core::domain::customer::{Customer, CustomerId};
use clientes_db::repositories::{
    CustomerRepository, InMemoryCustomerRepository, SqlCustomerRepository,
};
use clientes_db::{connect_with_settings, migrations, DbPool};

async fn migrated_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    pool
}

async fn exercise(store: &dyn CustomerRepository) -> Result<(), String> {
    let ana = store.save(Customer::new("Ana", "12345")).await.map_err(|e| e.to_string())?;
    let bea = store.save(Customer::new("Bea", "12399")).await.map_err(|e| e.to_string())?;
    if ana.id.is_unassigned() || bea.id <= ana.id {
        return Err(format!("ids should be assigned in order: {ana:?}, {bea:?}"));
    }

    let prefix = store.find_by_tax_id_prefix("123", CustomerId::UNASSIGNED).await.map_err(|e| e.to_string())?;
    if prefix.as_ref().map(|customer| customer.id) != Some(ana.id) {
        return Err(format!("prefix lookup should return the lowest id, got {prefix:?}"));
    }

    let own = store.find_by_tax_id_prefix("123", bea.id).await.map_err(|e| e.to_string())?;
    if own.as_ref().map(|customer| customer.id) != Some(bea.id) {
        return Err(format!("prefix lookup should rank the preferred row first, got {own:?}"));
    }

    let foreign =
        store.find_by_tax_id_prefix("1239", ana.id).await.map_err(|e| e.to_string())?;
    if foreign.as_ref().map(|customer| customer.id) != Some(bea.id) {
        return Err(format!("a non-matching preferred row must be ignored, got {foreign:?}"));
    }

    let literal = store.find_by_tax_id_prefix("12_", CustomerId::UNASSIGNED).await.map_err(|e| e.to_string())?;
    if literal.is_some() {
        return Err(format!("`_` must not act as a wildcard, got {literal:?}"));
    }

    let exact = store.find_by_tax_id("123").await.map_err(|e| e.to_string())?;
    if exact.is_some() {
        return Err(format!("exact lookup must not match a prefix, got {exact:?}"));
    }

    let pair = store.find_by_name_and_tax_id("Bea", "12399").await.map_err(|e| e.to_string())?;
    if pair != Some(bea.clone()) {
        return Err(format!("pair lookup mismatch: {pair:?}"));
    }

    let renamed = Customer { name: "Beatriz".to_string(), ..bea.clone() };
    store.save(renamed.clone()).await.map_err(|e| e.to_string())?;
    let by_name = store.find_by_name("Beatriz").await.map_err(|e| e.to_string())?;
    if by_name != Some(renamed) {
        return Err(format!("update should overwrite in place, got {by_name:?}"));
    }

    if !store.delete(ana.id).await.map_err(|e| e.to_string())? {
        return Err("delete of an existing id should report a removal".to_string());
    }
    if store.delete(CustomerId(9_999)).await.map_err(|e| e.to_string())? {
        return Err("delete of a missing id should report nothing removed".to_string());
    }

    let remaining: Vec<CustomerId> = store
        .find_all()
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|customer| customer.id)
        .collect();
    if remaining != vec![bea.id] {
        return Err(format!("unexpected remaining ids: {remaining:?}"));
    }

    Ok(())
}

#[tokio::test]
async fn sql_store_honours_the_contract() {
    let pool = migrated_pool().await;
    let store = SqlCustomerRepository::new(pool.clone());

    if let Err(message) = exercise(&store).await {
        panic!("sql store: {message}");
    }

    pool.close().await;
}

#[tokio::test]
async fn in_memory_store_honours_the_contract() {
    let store = InMemoryCustomerRepository::default();

    if let Err(message) = exercise(&store).await {
        panic!("in-memory store: {message}");
    }
}
