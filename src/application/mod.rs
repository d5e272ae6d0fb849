//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations over the ports. Handlers are
//! constructed once at the composition root with their dependencies passed
//! in explicitly (`Arc<dyn Port>`), never looked up globally.

pub mod chat_maintenance;
pub mod escrow;

pub use chat_maintenance::{
    AuditChatCommand, AuditChatHandler, ChatAuditReport, ChatMaintenanceError, RepairChatCommand,
    RepairChatHandler, RepairChatResult,
};
pub use escrow::{BeginCheckoutCommand, CheckoutSession, EscrowPaymentHandler, SettleAction};
