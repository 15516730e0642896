//! Assessment coordination: concurrent snapshot collection, engine
//! orchestration, TTL caching, and opportunity consistency.
//!
//! [`AssessmentCoordinator`] is the only component that writes risk fields
//! onto an opportunity. Callers hand it an [`ArbitrageOpportunity`] and
//! always get a displayable [`RiskAssessment`] back, whatever the network
//! did.
//!
//! [`ArbitrageOpportunity`]: arb_scout_core::opportunity::ArbitrageOpportunity
//! [`RiskAssessment`]: arb_scout_core::types::RiskAssessment

pub mod coordinator;
pub mod snapshot;

pub use coordinator::AssessmentCoordinator;
pub use snapshot::ExchangeSnapshot;
