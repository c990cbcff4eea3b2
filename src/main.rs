use rusty_circulation::{
    adapters::memory::{MemoryInventory, MemoryLoanStore, MemoryMemberDirectory},
    api::{handlers::AppState, router::create_router},
    application::loan::ServiceDependencies,
    domain::staging::BookSnapshot,
    domain::value_objects::{BookId, MemberId},
    ports::Member,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Seed the in-memory adapters with a starter catalog and member directory.
///
/// Catalog CRUD and member management are external collaborators; the
/// seed stands in for them so the service is usable out of the box.
fn seed(inventory: &MemoryInventory, directory: &MemoryMemberDirectory) {
    let books = [
        ("Laskar Pelangi", "Andrea Hirata", Some("Bentang Pustaka"), Some(2005), 3),
        ("Bumi Manusia", "Pramoedya Ananta Toer", Some("Hasta Mitra"), Some(1980), 2),
        ("Negeri 5 Menara", "Ahmad Fuadi", Some("Gramedia"), Some(2009), 4),
        ("Cantik Itu Luka", "Eka Kurniawan", None, Some(2002), 1),
    ];
    for (title, author, publisher, year, available) in books {
        inventory.add_book(BookSnapshot {
            book_id: BookId::new(),
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.map(str::to_string),
            year_published: year,
            isbn: None,
            available,
        });
    }

    let members = [
        ("Siti Rahma", "siti@example.com"),
        ("Budi Santoso", "budi@example.com"),
        ("Citra Lestari", "citra@example.com"),
    ];
    for (name, email) in members {
        directory.add_member(Member {
            member_id: MemberId::new(),
            name: name.to_string(),
            email: email.to_string(),
        });
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_circulation=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize adapters. The inventory doubles as the book catalog:
    // both ports read and mutate the same underlying records.
    let inventory = Arc::new(MemoryInventory::new());
    let loan_store = Arc::new(MemoryLoanStore::new());
    let member_directory = Arc::new(MemoryMemberDirectory::new());

    seed(&inventory, &member_directory);

    // Create service dependencies
    let service_deps = ServiceDependencies {
        inventory_ledger: inventory.clone(),
        loan_store,
        book_catalog: inventory,
        member_directory,
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
