//! Interactive menu loop.

use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::api::Session;
use crate::blockchain::ChainRpc;
use crate::orchestrator::Orchestrator;

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ClaimFaucet,
    CheckIn,
    TransferTask,
    Swap,
    Quit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" => Some(MenuChoice::ClaimFaucet),
            "2" => Some(MenuChoice::CheckIn),
            "3" => Some(MenuChoice::TransferTask),
            "4" => Some(MenuChoice::Swap),
            "5" | "q" | "quit" | "exit" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Parse a positive iteration count.
pub fn parse_count(input: &str) -> Result<u32, &'static str> {
    match input.trim().parse::<u32>() {
        Ok(0) => Err("Invalid number. Must be greater than 0."),
        Ok(n) => Ok(n),
        Err(_) => Err("Please enter a valid number"),
    }
}

/// Line-oriented prompt reader.
pub struct Menu<R> {
    lines: Lines<BufReader<R>>,
}

impl Menu<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Unpin> Menu<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Print `text` and read one line. `None` at end of input.
    pub async fn prompt(&mut self, text: &str) -> std::io::Result<Option<String>> {
        print!("{}", text);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    /// Ask for the private key; `None` when the user enters nothing.
    pub async fn private_key(&mut self) -> std::io::Result<Option<String>> {
        Ok(self
            .prompt("Enter your private key (or press Enter to exit): ")
            .await?
            .filter(|k| !k.is_empty()))
    }

    /// Run until the user quits or input ends.
    pub async fn run<C: ChainRpc>(
        &mut self,
        orchestrator: &Orchestrator<C>,
        session: &mut Session,
    ) -> std::io::Result<()> {
        loop {
            println!("\n=== Main Menu ===");
            println!("1. Claim Faucet");
            println!("2. Check In");
            println!("3. Send to Friend Task");
            println!("4. Swap");
            println!("5. Quit");

            let Some(input) = self.prompt("\nSelect an option: ").await? else {
                return Ok(());
            };

            match MenuChoice::parse(&input) {
                Some(MenuChoice::ClaimFaucet) => {
                    let _ = orchestrator.claim_faucet_and_refresh(session).await;
                }
                Some(MenuChoice::CheckIn) => {
                    let _ = orchestrator.check_in_and_refresh(session).await;
                }
                Some(MenuChoice::TransferTask) => {
                    if let Some(count) = self.count("How many transfers do you want to perform? ").await? {
                        orchestrator.run_transfer_task_sequence(session, count).await;
                        orchestrator.fetch_points(session).await;
                    }
                }
                Some(MenuChoice::Swap) => {
                    if let Some(count) = self.count("How many swaps do you want to perform? ").await? {
                        orchestrator.run_swap_sequence(count).await;
                    }
                }
                Some(MenuChoice::Quit) => {
                    tracing::info!("Exiting...");
                    return Ok(());
                }
                None => tracing::warn!("Invalid option. Please try again."),
            }
        }
    }

    async fn count(&mut self, text: &str) -> std::io::Result<Option<u32>> {
        let Some(input) = self.prompt(text).await? else {
            return Ok(None);
        };
        match parse_count(&input) {
            Ok(n) => Ok(Some(n)),
            Err(msg) => {
                tracing::warn!("{}", msg);
                Ok(None)
            }
        }
    }
}
