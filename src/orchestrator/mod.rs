//! Session orchestration.
//!
//! # Data Flow
//! ```text
//! authenticate (sign "pharos" → /user/login) → Session
//!     → check-in / faucet status → faucet claim / profile
//!     → transfer | wrap | unwrap (sign → submit → mined receipt) → ConfirmedTx
//!     → verify_task(ConfirmedTx) → /task/verify
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: one step finishes before the next starts
//! - Only login failure is fatal; every other step logs and returns a typed error
//! - Task verification takes a [`ConfirmedTx`], which only exists for mined,
//!   successful transactions
//! - The fixed delay between dependent steps is pacing, not a retry

pub mod amount;
pub mod error;
pub mod faucet;

use alloy::primitives::utils::{format_ether, format_units};
use alloy::primitives::{Address, TxHash, U256};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::sleep;

use crate::api::{ApiError, RewardsApi, Session};
use crate::blockchain::{BlockchainClient, BlockchainError, ChainRpc, MinedReceipt, TxBuilder};
use crate::config::validation::ValidationError;
use crate::config::{BotConfig, ConfigError};
use crate::observability::logging::{mask_address, short_hash};
use crate::observability::metrics;

pub use amount::AmountRange;
pub use error::{ActionError, AuthError};
pub use faucet::{ClaimOutcome, FaucetStatus, Remaining};

/// Task-level knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Pause between dependent on-chain steps.
    pub step_delay: Duration,
    pub transfer_amount: AmountRange,
    pub swap_amount: AmountRange,
    pub transfer_gas_limit: u64,
    pub contract_gas_limit: u64,
    /// Task submitted after each self-transfer.
    pub send_task_id: u64,
    pub wrapped_token: Address,
}

impl OrchestratorSettings {
    pub fn from_config(config: &BotConfig) -> Result<Self, ConfigError> {
        let wrapped_token = config.blockchain.wrapped_token.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::new(
                "blockchain.wrapped_token",
                "not a valid address",
            )])
        })?;

        Ok(Self {
            step_delay: Duration::from_secs(config.tasks.step_delay_secs),
            transfer_amount: config.tasks.transfer_amount.into(),
            swap_amount: config.tasks.swap_amount.into(),
            transfer_gas_limit: config.tasks.transfer_gas_limit,
            contract_gas_limit: config.tasks.contract_gas_limit,
            send_task_id: config.tasks.send_task_id,
            wrapped_token,
        })
    }
}

/// A transaction with a successful mined receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedTx {
    hash: TxHash,
    block_number: u64,
}

impl ConfirmedTx {
    fn from_receipt(receipt: MinedReceipt) -> Self {
        Self {
            hash: receipt.tx_hash,
            block_number: receipt.block_number,
        }
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }
}

/// Tally of one sequence run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceReport {
    pub attempted: u32,
    /// Iterations whose on-chain work fully confirmed.
    pub completed: u32,
    /// Iterations skipped for insufficient balance.
    pub skipped: u32,
    pub failed: u32,
    /// Task verifications the API accepted.
    pub verified: u32,
}

/// Drives the rewards API and the chain for one identity.
pub struct Orchestrator<C = BlockchainClient> {
    api: RewardsApi,
    tx: TxBuilder<C>,
    settings: OrchestratorSettings,
}

impl<C: ChainRpc> Orchestrator<C> {
    pub fn new(api: RewardsApi, tx: TxBuilder<C>, settings: OrchestratorSettings) -> Self {
        Self { api, tx, settings }
    }

    pub fn address(&self) -> Address {
        self.tx.address()
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Sign the login message and exchange it for a session.
    pub async fn authenticate(&self) -> Result<Session, AuthError> {
        let address = self.address();
        tracing::info!(address = %mask_address(&address), "Logging in");

        let signature = self
            .tx
            .wallet()
            .login_signature()
            .await
            .map_err(AuthError::Signing)?;

        let session = self
            .api
            .login(address, &signature)
            .await
            .map_err(AuthError::Rejected)?;

        tracing::info!(outcome = "success", "Login successful");
        Ok(session)
    }

    /// Accumulated points; 0 when the query fails.
    pub async fn fetch_points(&self, session: &mut Session) -> u64 {
        tracing::info!(address = %mask_address(&session.address()), "Getting points");
        match self.api.profile(session).await {
            Ok(profile) => {
                session.points = profile.user_info.total_points;
                metrics::record_points(session.points);
                tracing::info!(points = session.points, "Total points");
                session.points
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to get points");
                0
            }
        }
    }

    /// Daily check-in. A second call on the same day comes back as
    /// [`ApiError::Rejected`].
    pub async fn check_in(&self, session: &Session) -> Result<(), ApiError> {
        tracing::info!("Performing daily check-in");
        match self.api.check_in(session).await {
            Ok(()) => {
                tracing::info!(outcome = "success", "Check-in successful");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Check-in failed");
                Err(e)
            }
        }
    }

    pub async fn faucet_status(&self, session: &Session) -> Result<FaucetStatus, ApiError> {
        tracing::info!("Checking faucet status");
        let status: FaucetStatus = self
            .api
            .faucet_status(session)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to check faucet status"))?
            .into();

        if status.available {
            tracing::info!("Faucet is available for claim");
        } else {
            tracing::warn!(
                next_claim_in = %status.remaining(unix_now()),
                "Faucet not ready"
            );
        }
        Ok(status)
    }

    /// Claim the faucet, but only after the status endpoint says it is open.
    ///
    /// An API rejection of the claim itself is returned as an error and
    /// should be treated like ineligibility.
    pub async fn claim_faucet(&self, session: &Session) -> Result<ClaimOutcome, ApiError> {
        let status = self.faucet_status(session).await?;
        if !status.available {
            return Ok(ClaimOutcome::NotEligible(status));
        }

        tracing::info!("Claiming faucet");
        match self.api.claim_faucet(session).await {
            Ok(()) => {
                tracing::info!(outcome = "success", "Faucet claimed successfully");
                Ok(ClaimOutcome::Claimed)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to claim faucet");
                Err(e)
            }
        }
    }

    /// Check in, then refresh `session.points` when the check-in went through.
    pub async fn check_in_and_refresh(&self, session: &mut Session) -> Result<u64, ApiError> {
        self.check_in(session).await?;
        Ok(self.fetch_points(session).await)
    }

    /// Claim the faucet, then refresh `session.points` when something was claimed.
    pub async fn claim_faucet_and_refresh(
        &self,
        session: &mut Session,
    ) -> Result<ClaimOutcome, ApiError> {
        let outcome = self.claim_faucet(session).await?;
        if outcome == ClaimOutcome::Claimed {
            self.fetch_points(session).await;
        }
        Ok(outcome)
    }

    /// Send a random amount from `range` to `target` and wait for the receipt.
    pub async fn transfer(
        &self,
        target: Address,
        range: &AmountRange,
    ) -> Result<ConfirmedTx, ActionError> {
        let amount = range.sample(&mut rand::thread_rng());
        let result = self.transfer_exact(target, amount).await;
        log_action("transfer", amount, &result);
        result
    }

    async fn transfer_exact(&self, target: Address, amount: U256) -> Result<ConfirmedTx, ActionError> {
        let available = self.tx.native_balance().await?;
        ensure_covers(amount, available)?;

        let request = TxBuilder::<C>::transfer_request(target, amount);
        let receipt = self
            .tx
            .send_and_confirm(request, self.settings.transfer_gas_limit)
            .await?;
        Ok(ConfirmedTx::from_receipt(receipt))
    }

    /// Convert `amount` of native currency into the wrapped token.
    pub async fn wrap(&self, amount: U256) -> Result<ConfirmedTx, ActionError> {
        let result = async {
            let available = self.tx.native_balance().await?;
            ensure_covers(amount, available)?;

            let request = TxBuilder::<C>::deposit_request(self.settings.wrapped_token, amount);
            let receipt = self
                .tx
                .send_and_confirm(request, self.settings.contract_gas_limit)
                .await?;
            Ok::<_, ActionError>(ConfirmedTx::from_receipt(receipt))
        }
        .await;

        log_action("wrap", amount, &result);
        result
    }

    /// Convert `amount` of the wrapped token back into native currency.
    pub async fn unwrap(&self, amount: U256) -> Result<ConfirmedTx, ActionError> {
        let token = self.settings.wrapped_token;
        let result = async {
            let available = self.tx.token_balance(token).await?;
            ensure_covers(amount, available)?;

            let request = TxBuilder::<C>::withdraw_request(token, amount);
            let receipt = self
                .tx
                .send_and_confirm(request, self.settings.contract_gas_limit)
                .await?;
            Ok::<_, ActionError>(ConfirmedTx::from_receipt(receipt))
        }
        .await;

        log_action("unwrap", amount, &result);
        result
    }

    /// Submit proof of a confirmed on-chain action.
    pub async fn verify_task(
        &self,
        session: &Session,
        task_id: u64,
        tx: &ConfirmedTx,
    ) -> Result<String, ApiError> {
        tracing::info!(task_id, hash = %short_hash(&tx.hash), "Verifying task");
        match self.api.verify_task(session, task_id, tx.hash).await {
            Ok(msg) => {
                tracing::info!(outcome = "success", task_id, msg = %msg, "Task verification successful");
                Ok(msg)
            }
            Err(e) => {
                tracing::error!(task_id, error = %e, "Task verification failed");
                Err(e)
            }
        }
    }

    /// Wrap then unwrap a random small amount, `iterations` times.
    ///
    /// A failing iteration is logged and the next one starts.
    pub async fn run_swap_sequence(&self, iterations: u32) -> SequenceReport {
        let mut report = SequenceReport::default();

        if let Ok(balance) = self.tx.native_balance().await {
            tracing::info!(balance = %format_ether(balance), "Current balance (PHRS)");
        }

        for i in 1..=iterations {
            report.attempted += 1;
            let amount = self.settings.swap_amount.sample(&mut rand::thread_rng());
            tracing::info!(swap = i, total = iterations, amount = %format_ether(amount), "Performing swap");

            match self.wrap(amount).await {
                Ok(_) => {}
                Err(ActionError::InsufficientBalance { .. }) => {
                    tracing::warn!(swap = i, "Skipping swap");
                    report.skipped += 1;
                    continue;
                }
                Err(_) => {
                    tracing::error!(swap = i, "Failed to wrap for swap");
                    report.failed += 1;
                    continue;
                }
            }

            sleep(self.settings.step_delay).await;

            if self.unwrap(amount).await.is_err() {
                tracing::error!(swap = i, "Failed to unwrap for swap");
                report.failed += 1;
                continue;
            }

            report.completed += 1;
            tracing::info!(outcome = "success", swap = i, total = iterations, "Completed swap");

            if i < iterations {
                sleep(self.settings.step_delay).await;
            }
        }

        log_report("swap", &report);
        report
    }

    /// Self-transfer a random small amount and verify the send task for it,
    /// `iterations` times.
    pub async fn run_transfer_task_sequence(
        &self,
        session: &Session,
        iterations: u32,
    ) -> SequenceReport {
        let mut report = SequenceReport::default();
        let own_address = self.address();

        for i in 1..=iterations {
            report.attempted += 1;
            tracing::info!(transfer = i, total = iterations, "Performing transfer");

            let confirmed = match self.transfer(own_address, &self.settings.transfer_amount).await {
                Ok(confirmed) => confirmed,
                Err(ActionError::InsufficientBalance { .. }) => {
                    report.skipped += 1;
                    continue;
                }
                Err(_) => {
                    tracing::error!(transfer = i, "Failed to transfer");
                    report.failed += 1;
                    continue;
                }
            };
            report.completed += 1;

            sleep(self.settings.step_delay).await;

            match self
                .verify_task(session, self.settings.send_task_id, &confirmed)
                .await
            {
                Ok(_) => report.verified += 1,
                Err(_) => report.failed += 1,
            }

            if i < iterations {
                sleep(self.settings.step_delay).await;
            }
        }

        log_report("transfer", &report);
        report
    }

    /// Native and wrapped balances, formatted for display.
    pub async fn balances(&self) -> Result<(String, String), ActionError> {
        let token = self.settings.wrapped_token;
        let native = self.tx.native_balance().await?;
        let wrapped = self.tx.token_balance(token).await?;
        let decimals = self.tx.token_decimals(token).await?;
        let wrapped = format_units(wrapped, decimals)
            .map_err(|e| BlockchainError::Decode(e.to_string()))?;
        Ok((format_ether(native), wrapped))
    }
}

fn ensure_covers(required: U256, available: U256) -> Result<(), ActionError> {
    if required > available {
        return Err(ActionError::InsufficientBalance { required, available });
    }
    Ok(())
}

fn log_action(action: &'static str, amount: U256, result: &Result<ConfirmedTx, ActionError>) {
    metrics::record_transaction(action, result.is_ok());
    match result {
        Ok(confirmed) => tracing::info!(
            outcome = "success",
            action,
            amount = %format_ether(amount),
            hash = %short_hash(&confirmed.hash),
            block = confirmed.block_number,
            "Transaction confirmed"
        ),
        Err(ActionError::InsufficientBalance { required, available }) => tracing::warn!(
            action,
            required = %format_ether(*required),
            available = %format_ether(*available),
            "Insufficient balance"
        ),
        Err(e) => tracing::error!(action, error = %e, "Transaction failed"),
    }
}

fn log_report(kind: &str, report: &SequenceReport) {
    tracing::info!(
        kind,
        attempted = report.attempted,
        completed = report.completed,
        skipped = report.skipped,
        failed = report.failed,
        verified = report.verified,
        "Sequence finished"
    );
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
