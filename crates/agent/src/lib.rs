//! Intent handlers for the shopping assistant.
//!
//! The dialogue manager decides which action to run; this crate answers it:
//! - **Product lookup** (`resolver`) - keyword-overlap match of free text
//!   against the catalog, with availability listings for "do you have ...".
//! - **Follow-up** (`follow_up`) - details for the product remembered in the
//!   conversation context.
//! - **Replies** (`reply`) - shared message texts and the detail card.
//! - **Actions** (`actions`, `runtime`) - named entry points and per-turn dispatch.
//!
//! Everything here is deterministic and read-only over the catalog; the only
//! state a turn can change is the `last_product_id` slot, and that change is
//! returned to the caller rather than applied.

pub mod actions;
pub mod follow_up;
pub mod reply;
pub mod resolver;
pub mod runtime;

pub use actions::{
    Action, ActionOutcome, ActionRegistry, TurnInput, LAST_PRODUCT_DETAILS_ACTION,
    PRODUCT_INFO_ACTION,
};
pub use runtime::AgentRuntime;
