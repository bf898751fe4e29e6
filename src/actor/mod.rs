//! Actors: the threads of the dashboard and the messages they exchange.
//!
//! There are exactly two threads of control:
//! - **Reader**: blocks on the input stream, pushes lines into the queue
//! - **Main loop**: drains the queue, renders, polls keys (see [`crate::app`])
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   push (never waits)   ┌───────────┐   try_pop   ┌───────────┐
//! │ Reader Thread│ ─────────────────────▶ │ LineQueue │ ──────────▶ │ Main Loop │
//! └──────────────┘                        └───────────┘             └───────────┘
//!                                                                     ▲
//!                                                       InputEvent    │
//!                                                      (polled, non-  │
//!                                                       blocking)     │
//!                                                                  Terminal
//! ```

mod messages;
mod reader;

pub use messages::{Command, InputEvent, KeyCode, KeyModifiers, PAGE_ROWS};
pub use reader::{ReaderActor, ReaderExit};
