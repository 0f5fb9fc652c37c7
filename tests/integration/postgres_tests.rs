//! Durable storage tests against a live PostgreSQL database
//!
//! Run with: DATABASE_URL=postgres://... cargo test --test postgres_tests -- --ignored

use std::collections::HashSet;

use equiptrack_server::{
    config::DatabaseConfig,
    models::{CreateClient, CreateEquipment, EquipmentType},
    repository::Repository,
    services::Services,
    store::{Storage, StorageMode},
};

async fn durable_services() -> (Storage, Services) {
    let config = DatabaseConfig {
        url: Some(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")),
        ..DatabaseConfig::default()
    };
    let storage = Storage::select(&config).await.expect("Storage selection failed");
    assert_eq!(storage.mode(), StorageMode::Durable);
    storage.counters.seed().await.expect("Seeding failed");
    let services = Services::new(Repository::new(&storage));
    (storage, services)
}

fn new_computer(client_id: uuid::Uuid) -> CreateEquipment {
    CreateEquipment {
        equipment_type: EquipmentType::Computer,
        client_id,
        brand: "Lenovo".into(),
        model: "ThinkCentre M70".into(),
        serial_number: "PG-0001".into(),
        sector: "Support".into(),
        operator: None,
        battery_date: None,
        observations: None,
        photo_url: None,
    }
}

#[tokio::test]
#[ignore]
async fn test_seed_is_idempotent() {
    let (storage, _) = durable_services().await;
    let before = storage.counters.get(EquipmentType::Ups).await.unwrap();
    storage.counters.seed().await.unwrap();
    let after = storage.counters.get(EquipmentType::Ups).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_creates_get_distinct_names() {
    let (storage, services) = durable_services().await;
    let client = services
        .clients
        .create(CreateClient {
            name: "Postgres concurrency".into(),
            description: None,
        })
        .await
        .unwrap();
    let start = storage.counters.get(EquipmentType::Computer).await.unwrap();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let equipment = services.equipment.clone();
            let data = new_computer(client.id);
            tokio::spawn(async move { equipment.create(data).await })
        })
        .collect();

    let mut names = HashSet::new();
    let mut ids = Vec::new();
    for handle in handles {
        let created = handle.await.unwrap().unwrap();
        ids.push(created.id);
        names.insert(created.name);
    }
    assert_eq!(names.len(), 20);
    assert_eq!(
        storage.counters.get(EquipmentType::Computer).await.unwrap(),
        start + 20
    );

    for id in ids {
        services.equipment.delete(id).await.unwrap();
    }
    services.clients.delete(client.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_client_with_equipment_is_protected() {
    let (_, services) = durable_services().await;
    let client = services
        .clients
        .create(CreateClient {
            name: "Postgres integrity".into(),
            description: None,
        })
        .await
        .unwrap();
    let created = services.equipment.create(new_computer(client.id)).await.unwrap();

    let refused = services.clients.delete(client.id).await;
    assert!(matches!(
        refused,
        Err(equiptrack_server::AppError::ReferenceInUse(_))
    ));

    services.equipment.delete(created.id).await.unwrap();
    services.clients.delete(client.id).await.unwrap();
}
