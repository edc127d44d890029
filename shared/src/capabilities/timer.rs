use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Handle of a scheduled one-shot timer. The core keeps it to cancel the timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub String);

impl TimerId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum TimerOperation {
    Start { id: TimerId, millis: u64 },
    Cancel { id: TimerId },
}

/// Resolution of a `Start` request. A cancelled timer resolves as `Cancelled`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOutput {
    Elapsed,
    Cancelled,
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

pub struct Timer<E> {
    context: CapabilityContext<TimerOperation, E>,
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<E> Timer<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, E>) -> Self {
        Self { context }
    }

    pub fn start<F>(&self, id: TimerId, delay: Duration, callback: F)
    where
        F: FnOnce(TimerOutput) -> E + Send + 'static,
        E: Send,
    {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(TimerOperation::Start { id, millis })
                .await;
            ctx.update_app(callback(output));
        });
    }

    pub fn cancel(&self, id: TimerId)
    where
        E: Send,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(TimerOperation::Cancel { id }).await;
        });
    }
}
