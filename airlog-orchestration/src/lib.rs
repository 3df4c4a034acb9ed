//! # 🎭 airlog-orchestration — Ciclos de Amostragem
//!
//! Executa todos os drivers configurados uma vez por ciclo, em paralelo,
//! cada um isolado das falhas dos outros, e junta o que chegou em um único
//! `ReadingSet`.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  SamplingCoordinator                     │
//! │                                                          │
//! │   ┌────────┐   ┌────────┐   ┌────────┐   ┌────────┐      │
//! │   │  pms   │   │  sds   │   │  dht   │   │  mic   │      │  fan-out
//! │   └───┬────┘   └───┬────┘   └───┬────┘   └───┬────┘      │  (uma thread
//! │       │            │            │            │           │   por driver)
//! │       └────────────┴─────┬──────┴────────────┘           │
//! │                          ▼                               │
//! │                 canal (índice, resultado)                │  fan-in
//! │                          ▼                               │
//! │               CycleReport { readings, failures }         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Se nenhuma métrica chegou, o ciclo falha com `NoDataAcquired`. Qualquer
//! outra falha de driver vira apenas uma métrica ausente.
//!
//! ## Exemplo
//!
//! ```ignore
//! use airlog_orchestration::SamplingCoordinator;
//!
//! let mut coordinator = SamplingCoordinator::new(vec![Box::new(sds), Box::new(dht)])?;
//! let report = coordinator.run_cycle()?;
//! for reading in report.readings().iter() {
//!     println!("{} = {}", reading.metric(), reading.value());
//! }
//! ```

pub mod coordinator;
pub mod error;
pub mod report;
pub mod scheduler;

pub use coordinator::SamplingCoordinator;
pub use error::{OrchestrationError, OrchestrationResult};
pub use report::{CycleReport, DriverFailure, FailureCause};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerStats, TickInfo};

// Re-exporta tipos do core
pub use airlog_core::prelude::*;
