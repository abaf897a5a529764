//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy::sol_types::{SolCall, SolValue};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pharos_bot::api::RewardsApi;
use pharos_bot::blockchain::contract::IWrappedToken;
use pharos_bot::blockchain::{
    BlockchainError, BlockchainResult, ChainRpc, MinedReceipt, TxBuilder, TxSettings, Wallet,
};
use pharos_bot::config::ApiConfig;
use pharos_bot::orchestrator::{AmountRange, Orchestrator, OrchestratorSettings};

// Well-known test private key (Anvil's first account)
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const CHAIN_ID: u64 = 688688;
pub const ONE_GWEI: u128 = 1_000_000_000;

pub fn ether(units: u64) -> U256 {
    U256::from(units) * U256::from(10u64).pow(U256::from(18u64))
}

pub fn wrapped_token() -> Address {
    "0x76aaada469d23216be5f7c596fa25f282ff9b364".parse().unwrap()
}

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_PRIVATE_KEY, CHAIN_ID).unwrap()
}

// ---------------------------------------------------------------------------
// Rewards API mock
// ---------------------------------------------------------------------------

/// One request as seen by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Handle to a running mock API.
#[derive(Clone)]
pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApi {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn client(&self) -> RewardsApi {
        RewardsApi::new(&ApiConfig {
            base_url: self.base_url.clone(),
            request_timeout_secs: 5,
            ..ApiConfig::default()
        })
        .unwrap()
    }
}

/// JSON envelope body.
pub fn envelope(code: i64, msg: &str, data: serde_json::Value) -> String {
    serde_json::json!({ "code": code, "msg": msg, "data": data }).to_string()
}

/// Start a programmable mock of the rewards API on an ephemeral port.
pub async fn start_mock_api<F>(handler: F) -> MockApi
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        recorded.lock().unwrap().push(request.clone());

                        let (status, body) = handler(&request);
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockApi {
        base_url: format!("http://{}", addr),
        requests,
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?;
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let authorization = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string());

    Some(RecordedRequest {
        method,
        path: path.to_string(),
        query: query.to_string(),
        authorization,
    })
}

/// Mock that accepts login and answers every other endpoint with success.
pub async fn start_happy_api() -> MockApi {
    start_mock_api(|req| {
        let body = match req.path.as_str() {
            "/user/login" => envelope(0, "ok", serde_json::json!({ "jwt": "test-jwt" })),
            "/user/profile" => envelope(
                0,
                "ok",
                serde_json::json!({ "user_info": { "TotalPoints": 150 } }),
            ),
            "/faucet/status" => envelope(
                0,
                "ok",
                serde_json::json!({ "is_able_to_faucet": true, "avaliable_timestamp": 0 }),
            ),
            "/task/verify" => envelope(0, "task verified", serde_json::Value::Null),
            _ => envelope(0, "ok", serde_json::Value::Null),
        };
        (200, body)
    })
    .await
}

// ---------------------------------------------------------------------------
// In-memory ledger
// ---------------------------------------------------------------------------

/// How the fake ledger resolves submitted transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mining {
    /// Mined immediately, successful.
    Succeed,
    /// Mined immediately, reverted.
    Revert,
    /// Never mined.
    Never,
}

/// A decoded submitted transaction.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub hash: TxHash,
    pub envelope: TxEnvelope,
}

#[derive(Debug)]
pub struct LedgerState {
    pub owner: Address,
    pub token: Address,
    pub native: U256,
    pub wrapped: U256,
    pub nonce: u64,
    pub base_fee: Option<u128>,
    pub priority_fee_supported: bool,
    pub gas_price: u128,
    pub mining: Mining,
    pub block: u64,
    pub submitted: Vec<Submitted>,
    pub receipts: Vec<MinedReceipt>,
}

/// Gas-free ledger for one owner and one wrapped token.
#[derive(Clone)]
pub struct FakeLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl FakeLedger {
    pub fn new(owner: Address, native: U256) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                owner,
                token: wrapped_token(),
                native,
                wrapped: U256::ZERO,
                nonce: 0,
                base_fee: Some(ONE_GWEI),
                priority_fee_supported: true,
                gas_price: ONE_GWEI,
                mining: Mining::Succeed,
                block: 100,
                submitted: Vec::new(),
                receipts: Vec::new(),
            })),
        }
    }

    /// Inspect or tweak state.
    pub fn with<T>(&self, f: impl FnOnce(&mut LedgerState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.with(|s| s.submitted.clone())
    }

    pub fn receipt_for(&self, hash: TxHash) -> Option<MinedReceipt> {
        self.with(|s| s.receipts.iter().find(|r| r.tx_hash == hash).copied())
    }

    fn apply(state: &mut LedgerState, envelope: &TxEnvelope) {
        let value = envelope.value();
        let input = envelope.input();

        if envelope.to() == Some(state.token) {
            if input.starts_with(&IWrappedToken::depositCall::SELECTOR) {
                state.native -= value;
                state.wrapped += value;
            } else if input.starts_with(&IWrappedToken::withdrawCall::SELECTOR) {
                let call = IWrappedToken::withdrawCall::abi_decode(input).unwrap();
                state.wrapped -= call.wad;
                state.native += call.wad;
            }
        } else if envelope.to() != Some(state.owner) {
            state.native -= value;
        }
    }
}

impl ChainRpc for FakeLedger {
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        Ok(self.with(|s| if address == s.owner { s.native } else { U256::ZERO }))
    }

    async fn get_transaction_count(&self, _address: Address) -> BlockchainResult<u64> {
        Ok(self.with(|s| s.nonce))
    }

    async fn get_latest_base_fee(&self) -> BlockchainResult<Option<u128>> {
        Ok(self.with(|s| s.base_fee))
    }

    async fn get_max_priority_fee(&self) -> BlockchainResult<u128> {
        if self.with(|s| s.priority_fee_supported) {
            Ok(ONE_GWEI / 10)
        } else {
            Err(BlockchainError::Rpc("eth_maxPriorityFeePerGas: method not found".to_string()))
        }
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        Ok(self.with(|s| s.gas_price))
    }

    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        self.with(|s| {
            if to != s.token {
                return Err(BlockchainError::Rpc("execution reverted".to_string()));
            }
            if data.starts_with(&IWrappedToken::balanceOfCall::SELECTOR) {
                Ok(s.wrapped.abi_encode().into())
            } else if data.starts_with(&IWrappedToken::decimalsCall::SELECTOR) {
                Ok(U256::from(18u8).abi_encode().into())
            } else {
                Err(BlockchainError::Rpc("unknown selector".to_string()))
            }
        })
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let mut buf: &[u8] = &raw;
        let envelope = TxEnvelope::decode_2718(&mut buf)
            .map_err(|e| BlockchainError::Rpc(format!("invalid raw transaction: {}", e)))?;
        let hash = keccak256(&raw);

        self.with(|s| {
            s.nonce += 1;
            s.submitted.push(Submitted {
                hash,
                envelope: envelope.clone(),
            });
            match s.mining {
                Mining::Never => {}
                Mining::Revert => {
                    s.block += 1;
                    s.receipts.push(MinedReceipt {
                        tx_hash: hash,
                        block_number: s.block,
                        success: false,
                    });
                }
                Mining::Succeed => {
                    Self::apply(s, &envelope);
                    s.block += 1;
                    s.receipts.push(MinedReceipt {
                        tx_hash: hash,
                        block_number: s.block,
                        success: true,
                    });
                }
            }
        });
        Ok(hash)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<MinedReceipt>> {
        Ok(self.receipt_for(tx_hash))
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub fn fast_tx_settings() -> TxSettings {
    TxSettings {
        poll_interval: Duration::from_millis(10),
        confirmation_timeout: Duration::from_millis(300),
        max_gas_price_gwei: 500,
    }
}

pub fn fast_settings() -> OrchestratorSettings {
    OrchestratorSettings {
        step_delay: Duration::ZERO,
        transfer_amount: AmountRange::new(1_000, 10_000),
        swap_amount: AmountRange::new(1_000, 5_000),
        transfer_gas_limit: 21_000,
        contract_gas_limit: 50_000,
        send_task_id: 103,
        wrapped_token: wrapped_token(),
    }
}

/// Orchestrator over a fake ledger and a mock API.
pub fn orchestrator(api: &MockApi, ledger: &FakeLedger) -> Orchestrator<FakeLedger> {
    let tx = TxBuilder::new(ledger.clone(), test_wallet(), fast_tx_settings());
    Orchestrator::new(api.client(), tx, fast_settings())
}
