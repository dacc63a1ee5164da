//! The TESS turn pipeline.
//!
//! 1. **Receive** a user message for a dossier
//! 2. **Ask the model** once, with the transcript and the tool schemas
//! 3. **If tool calls**: run them through the [`ToolCallEngine`], which
//!    applies their patches in request order, and render the outcomes with
//!    the [`presenter`]
//! 4. **If text**: return it unchanged
//! 5. **Persist** the dossier once, at the end of the turn
//!
//! Slash commands (`/bronnen`, `/reset`, `/help`) are answered before the
//! model is consulted.

pub mod commands;
pub mod engine;
pub mod presenter;
pub mod prompts;
pub mod turn;

pub use commands::Command;
pub use engine::ToolCallEngine;
pub use presenter::present;
pub use turn::{APOLOGY, TurnController, TurnReply};
