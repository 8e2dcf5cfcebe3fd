use std::time::Instant;

use anyhow::Result;
use workec_rs::{EcClient, EcConfig, Endpoint};

#[tokio::main]
async fn main() -> Result<()> {
    // One client shared by every task
    let client = EcClient::new(EcConfig::from_env())?;

    let sale_ids: Vec<u64> = vec![1001, 1002, 1003, 1004, 1005, 1006, 1007, 1008];

    println!("Fetching {} sales records concurrently...", sale_ids.len());
    let start = Instant::now();

    let handles: Vec<_> = sale_ids
        .iter()
        .map(|&sale_id| {
            let client = client.clone(); // Cheap clone (shared pool)
            tokio::spawn(async move {
                let params = serde_json::json!({ "saleId": sale_id });
                let result = client.call_endpoint(Endpoint::GetSalesDetail, &params).await;
                (sale_id, result)
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        let (sale_id, result) = handle.await?;
        match result {
            Ok(body) => {
                succeeded += 1;
                println!("[{}] {}", sale_id, body);
            }
            Err(e) => eprintln!("[{}] Error: {}", sale_id, e),
        }
    }

    let elapsed = start.elapsed();
    println!("\n{} of {} calls returned a body in {:?}", succeeded, sale_ids.len(), elapsed);

    Ok(())
}
