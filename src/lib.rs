//! cash-envelope - envelope budgeting backed by physical cash
//!
//! Every deposit is split by percentage across an owner's accounts after
//! recurring expenses are reserved. Each account keeps its balance in
//! capacity-bounded sub-accounts, and every sub-account is backed by an
//! exact inventory of notes and coins. Cash that cannot be placed yet waits
//! in the owner's pending store.
//!
//! # Architecture
//!
//! - `config`: paths and user settings
//! - `error`: custom error types
//! - `models`: money, denominations, cash stores and ledger entities
//! - `storage`: single-document JSON store with transactions
//! - `engine`: distribution, logical deposit and cash extraction
//! - `services`: business operations, one transaction each
//! - `audit`: append-only audit log
//! - `export`: JSON, YAML and CSV export
//! - `cli` / `display`: command line surface
//!
//! # Example
//!
//! ```rust,ignore
//! use cash_envelope::config::paths::LedgerPaths;
//! use cash_envelope::services::{DepositService, OwnerService};
//! use cash_envelope::storage::Storage;
//!
//! let storage = Storage::open(LedgerPaths::new()?)?;
//! let owner = OwnerService::new(&storage).resolve("default")?;
//! let receipt = DepositService::new(&storage).apply_deposit(owner.id, &cash)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
