//! Basic example: five submissions per second.
//!
//! Sends six documents (the sixth is rejected), waits a second, then sends
//! ten more (five are admitted). Set `SUBMIT_ENDPOINT` to point it at a real
//! server; the default endpoint does not exist, so admitted submissions end
//! in transport errors.

use chrono::Local;
use std::time::Duration;
use submit_throttle::{Admission, Description, Document, Product, RateLimitedClient, TimeUnit};

fn sample_document() -> Document {
    let today = Local::now().date_naive();
    Document {
        description: Description::new("test"),
        doc_id: "test".to_string(),
        doc_status: "test".to_string(),
        doc_type: "test".to_string(),
        import_request: true,
        owner_inn: "test".to_string(),
        participant_inn: "test".to_string(),
        producer_inn: "test".to_string(),
        production_date: Some(today),
        production_type: "test".to_string(),
        products: vec![Product {
            certificate_document: "test".to_string(),
            certificate_document_date: Some(today),
            certificate_document_number: "test".to_string(),
            owner_inn: "test".to_string(),
            production_date: Some(today),
            tnved_code: "test".to_string(),
            uit_code: "test".to_string(),
            uitu_code: "test".to_string(),
        }],
        reg_date: Some(today),
        reg_number: "test".to_string(),
    }
}

fn send_batch(client: &RateLimitedClient, count: usize, pending: &mut Vec<Admission>) {
    for i in 1..=count {
        match client.process(sample_document(), "test") {
            Ok(admission) if admission.is_admitted() => {
                println!("  call {}: admitted", i);
                pending.push(admission);
            }
            Ok(_) => println!("  call {}: blocked", i),
            Err(e) => println!("  call {}: admitted but not queued: {}", i, e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Debug level shows every admit and reject decision
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let endpoint = std::env::var("SUBMIT_ENDPOINT")
        .unwrap_or_else(|_| "https://test.com/api/v3/lk/documents/create".to_string());

    let client = RateLimitedClient::builder()
        .with_rate(TimeUnit::Seconds, 5)
        .with_endpoint(endpoint)
        .with_request_timeout(Duration::from_secs(5))
        .build()?;

    println!("=== Rate Limited Submission Example ===\n");
    println!("Limit: 5 submissions per second\n");

    let mut pending = Vec::new();

    println!("Sending 6 documents:");
    send_batch(&client, 6, &mut pending);

    tokio::time::sleep(Duration::from_secs(1)).await;

    println!("\nSending 10 documents after one second:");
    send_batch(&client, 10, &mut pending);

    println!("\nOutcomes:");
    for admission in pending {
        if let Some(handle) = admission.into_handle() {
            let id = handle.id();
            match handle.outcome().await {
                Ok(response) => println!("  #{}: {} {}", id, response.status, response.body),
                Err(e) => println!("  #{}: {}", id, e),
            }
        }
    }

    client.shutdown().await?;

    let snapshot = client.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Admitted: {}, blocked: {}",
        snapshot.admissions_granted, snapshot.admissions_rejected
    );

    Ok(())
}
