//! Metrics sink boundary.
//!
//! Model logic never touches the counter state directly; every
//! instrumentation point flows through [`ModelEvent`] and [`MetricsSink`],
//! and tests can swap the sink for a scoped capture.

use crate::{error::ErrorClass, types::Timestamp};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static STATE: RefCell<ModelMetrics> = RefCell::new(ModelMetrics::new());
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// CallKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
    Getter,
    Setter,
    /// Identity read forwarded without a descriptor lookup.
    Forward,
    /// Qualified-name composition over two inner getter calls.
    Compose,
}

///
/// ModelEvent
///

#[derive(Clone, Copy, Debug)]
pub enum ModelEvent {
    DispatchCall { kind: CallKind },
    DispatchFault { class: ErrorClass },
    ProviderResolved { ok: bool },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: ModelEvent);
}

/// Default process-local sink writing into the thread-local counter state.
struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: ModelEvent) {
        STATE.with_borrow_mut(|m| match event {
            ModelEvent::DispatchCall { kind } => match kind {
                CallKind::Getter => m.getter_calls = m.getter_calls.saturating_add(1),
                CallKind::Setter => m.setter_calls = m.setter_calls.saturating_add(1),
                CallKind::Forward => m.forwards = m.forwards.saturating_add(1),
                CallKind::Compose => m.composes = m.composes.saturating_add(1),
            },
            ModelEvent::DispatchFault { class } => match class {
                ErrorClass::ServiceFault | ErrorClass::Internal => {
                    m.service_faults = m.service_faults.saturating_add(1);
                }
                _ => m.usage_faults = m.usage_faults.saturating_add(1),
            },
            ModelEvent::ProviderResolved { ok } => {
                m.providers_resolved = m.providers_resolved.saturating_add(1);
                if !ok {
                    m.provider_faults = m.provider_faults.saturating_add(1);
                }
            }
        });
    }
}

///
/// ModelMetrics
///
/// Ephemeral in-memory counters for dispatch traffic and deferred-value
/// resolution on the current thread.
///

#[derive(Clone, Debug, Serialize)]
pub struct ModelMetrics {
    pub getter_calls: u64,
    pub setter_calls: u64,
    pub forwards: u64,
    pub composes: u64,
    pub usage_faults: u64,
    pub service_faults: u64,
    pub providers_resolved: u64,
    pub provider_faults: u64,
    pub since: Timestamp,
}

impl ModelMetrics {
    fn new() -> Self {
        Self {
            getter_calls: 0,
            setter_calls: 0,
            forwards: 0,
            composes: 0,
            usage_faults: 0,
            service_faults: 0,
            providers_resolved: 0,
            provider_faults: 0,
            since: Timestamp::now(),
        }
    }
}

/// Record an event on the active sink: the scoped override when one is
/// installed, the global counters otherwise.
pub(crate) fn record(event: ModelEvent) {
    let sink = SINK_OVERRIDE.with_borrow(|s| s.clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Run `f` with `sink` installed as the thread's sink, restoring the
/// previous one on the way out (panics included).
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Restore(Option<Rc<dyn MetricsSink>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            SINK_OVERRIDE.with_borrow_mut(|s| *s = previous);
        }
    }

    let previous = SINK_OVERRIDE.with_borrow_mut(|s| s.replace(sink));
    let _restore = Restore(previous);
    f()
}

/// Snapshot of the current thread's counters.
#[must_use]
pub fn metrics_snapshot() -> ModelMetrics {
    STATE.with_borrow(Clone::clone)
}

/// Zero the current thread's counters.
pub fn metrics_reset() {
    STATE.with_borrow_mut(|m| *m = ModelMetrics::new());
}
