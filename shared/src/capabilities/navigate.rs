use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Page navigation performed by the shell. Fire-and-forget: the page unloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum NavigateOperation {
    Redirect { url: String },
}

impl Operation for NavigateOperation {
    type Output = ();
}

pub struct Navigate<E> {
    context: CapabilityContext<NavigateOperation, E>,
}

impl<Ev> Capability<Ev> for Navigate<Ev> {
    type Operation = NavigateOperation;
    type MappedSelf<MappedEv> = Navigate<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigate::new(self.context.map_event(f))
    }
}

impl<E> Navigate<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<NavigateOperation, E>) -> Self {
        Self { context }
    }

    /// `url` is passed through untouched; relative targets resolve in the shell.
    pub fn redirect(&self, url: &str)
    where
        E: Send,
    {
        let operation = NavigateOperation::Redirect {
            url: url.to_string(),
        };
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
