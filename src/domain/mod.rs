//! Domain layer - pure types and decision logic.
//!
//! Nothing in here performs I/O. The quota policy, credit formula and
//! webhook verification are plain functions over plain data so they can
//! be tested exhaustively without a store or a network.

pub mod identity;
pub mod ledger;
pub mod payment;
