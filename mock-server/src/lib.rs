use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, routing::post, Form, Router};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};

/// Fields reported for one completed transaction, in response order.
pub type TransactionFields = Vec<(String, String)>;

/// Known transactions, keyed by transaction token.
pub type Db = Arc<RwLock<HashMap<String, TransactionFields>>>;

/// Form payload the PDT confirmation endpoint expects.
#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub cmd: String,
    pub tx: String,
    pub at: String,
}

#[derive(Clone)]
pub struct PdtState {
    pub auth_token: String,
    pub transactions: Db,
}

/// Fresh server state for the given merchant auth token, with no
/// transactions seeded.
pub fn state(auth_token: &str) -> PdtState {
    PdtState {
        auth_token: auth_token.to_string(),
        transactions: Arc::new(RwLock::new(HashMap::new())),
    }
}

pub fn app(state: PdtState) -> Router {
    Router::new()
        .route("/cgi-bin/webscr", post(confirm))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: PdtState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn confirm(State(state): State<PdtState>, Form(request): Form<ConfirmRequest>) -> String {
    if request.cmd != "_notify-synch" || request.at != state.auth_token {
        return fail_body();
    }
    let transactions = state.transactions.read().await;
    match transactions.get(&request.tx) {
        Some(fields) => success_body(fields),
        None => fail_body(),
    }
}

fn success_body(fields: &[(String, String)]) -> String {
    let mut body = String::from("SUCCESS\n");
    for (key, value) in fields {
        body.push_str(&encode(key));
        body.push('=');
        body.push_str(&encode(value));
        body.push('\n');
    }
    body
}

fn fail_body() -> String {
    "FAIL\nError: could not confirm transaction\n".to_string()
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}
