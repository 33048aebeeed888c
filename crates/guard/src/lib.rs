//! `konsut-guard`: route guard state machine and the flag store it reads.
//!
//! The guard owns no session: the authentication layer hands it one through
//! resolution tickets, and the guard answers every navigation with render,
//! pending or redirect.

pub mod config;
pub mod flags;
pub mod guard;

pub use config::{ConfigError, GuardConfig};
pub use flags::{FlagStore, FlagStoreError, JsonFileFlagStore, MemoryFlagStore, maintenance_active};
pub use guard::{GuardOutcome, GuardState, ResolutionTicket, RouteGuard};
