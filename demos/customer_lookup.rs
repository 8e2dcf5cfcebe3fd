use anyhow::Result;
use workec_rs::{CustomerLookup, EcClient, EcConfig, Endpoint, endpoints};

#[tokio::main]
async fn main() -> Result<()> {
    let client = EcClient::new(EcConfig::from_env())?;

    let params = endpoints::customer_query(&CustomerLookup::Mobiles(vec![
        "13800000000".to_string(),
        "13900000000".to_string(),
    ]));

    match client.call_endpoint(Endpoint::GetCustomer, &params).await {
        Ok(body) => {
            // The library does not interpret the body; peek at errCode here
            let json: serde_json::Value = serde_json::from_str(&body)?;
            println!(
                "errCode: {}",
                json.get("errCode").or_else(|| json.get("code")).unwrap_or(&serde_json::Value::Null)
            );
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(e) => eprintln!("Lookup failed: {}", e),
    }

    Ok(())
}
