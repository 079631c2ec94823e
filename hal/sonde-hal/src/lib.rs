//! Sonde Link Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the receiver and relay
//! need. Chip-specific HALs implement them; host tests implement them
//! with scripted simulations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (sonde-firmware, tests)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sonde-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  sonde-hal-   │       │ embedded-hal  │
//! │    rp2040     │       │   adapters    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`delay::BusyWait`] - Blocking microsecond delays
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`debug::DebugSink`] - Line-oriented status output

#![no_std]
#![deny(unsafe_code)]

pub mod debug;
pub mod delay;
pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use debug::DebugSink;
pub use delay::BusyWait;
pub use gpio::{InputPin, OutputPin};
pub use uart::{UartRx, UartTx};
