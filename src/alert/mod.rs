//! Alert pipeline: enrichment, cooldown gating and channel fan-out.

pub mod channels;
pub mod dispatcher;
pub mod event;
pub mod notifier;
pub mod spread;

pub use dispatcher::{AlertDispatcher, DispatchOutcome};
pub use event::AlertEvent;
pub use notifier::{Notifier, SendResult};
pub use spread::{ConfidenceBucket, HeuristicSpreadEstimator, SpreadEstimator};
