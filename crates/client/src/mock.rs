use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use timetable_board_core::errors::BoardResult;
use timetable_board_core::models::{Envelope, SchedulePayload, TelemetryDomain};

use crate::source::TelemetrySource;

// Mock telemetry source for testing
mock! {
    pub Source {}

    #[async_trait]
    impl TelemetrySource for Source {
        async fn schedule(&self) -> BoardResult<Envelope<SchedulePayload>>;

        async fn telemetry(&self, domain: TelemetryDomain) -> BoardResult<Envelope<Value>>;
    }
}
