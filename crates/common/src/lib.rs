pub mod event_bus;
pub mod structured_logging;
pub mod timer;

pub use event_bus::{EventBus, EventEnvelope, Topic};
pub use structured_logging::{
    init_structured_logging,
    parse_level,
    ExecutionContext,
    LoggingConfig,
    OperationTimer,
    PerformanceMetrics,
    RequestContext,
    StructuredLogEntry,
};
pub use timer::DebounceTimer;
