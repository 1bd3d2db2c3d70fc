use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let state = mock_server::state("demo-auth-token");
    state.transactions.write().await.insert(
        "4X9012345A6789012".to_string(),
        vec![
            ("first_name".to_string(), "John".to_string()),
            ("last_name".to_string(), "Doe".to_string()),
            ("mc_gross".to_string(), "19.99".to_string()),
            ("mc_currency".to_string(), "USD".to_string()),
        ],
    );

    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run(listener, state).await
}
