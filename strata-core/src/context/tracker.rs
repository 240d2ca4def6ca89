//! Context Tracker
//!
//! The long-lived tracker instance: it owns the threshold table, the
//! cached viewport dimensions, the current bucket index and snapshot, and
//! the listener registry. Construction computes an initial bucket and
//! snapshot synchronously (without firing) and binds a rate-limited
//! handler to the host's change signals.
//!
//! # Evaluation Cycle
//!
//! Each (rate-limited) signal runs one pass of `contextualize`:
//!
//! 1. Re-read width and height from the viewport collaborator. The
//!    cached dimensions are always overwritten, even when the bucket
//!    does not change.
//! 2. Recompute the bucket index.
//! 3. If the index moved: cache it, rebuild the snapshot, and dispatch a
//!    `change` event carrying the new snapshot plus the triggering signal
//!    to every `change` listener, in registration order, synchronously.
//! 4. Otherwise nothing is rebuilt and nothing is dispatched.
//!
//! The silent width/height update on an unchanged bucket is a documented
//! quirk, as is the snapshot staying frozen between bucket changes even
//! when pixel ratio or interaction mode drift independently of width.
//!
//! # Ownership
//!
//! There is no implicit global singleton: whoever needs viewport context
//! constructs a tracker and owns it. Cloning shares state. The handlers
//! bound into the host hold only a weak reference, so dropping every
//! tracker handle ends evaluation.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::config::Config;
use super::snapshot::{BucketName, ContextSnapshot, Interaction};
use super::thresholds::{ThresholdEntry, ThresholdTable};
use crate::error::ContextError;
use crate::events::{ContextEvent, EventEmitter, Listener, Trigger, CHANGE};
use crate::host::{Capabilities, HostEnv};
use crate::timing::Debouncer;

/// The documented fields readable through [`ContextTracker::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Cached viewport width.
    Width,
    /// Cached viewport height.
    Height,
    /// The boundary widths, ascending.
    Thresholds,
    /// The boundary names; empty for anonymous tables.
    ThresholdNames,
    /// Snapshot: device pixel ratio.
    PixelRatio,
    /// Snapshot: interaction mode.
    Interaction,
    /// Snapshot: bucket name.
    Name,
    /// Snapshot: boundary value of the current bucket.
    Threshold,
}

/// A typed field value returned by [`ContextTracker::value`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Pixels(u32),
    Ratio(f64),
    Interaction(Interaction),
    Name(BucketName),
    Widths(Vec<u32>),
    Names(Vec<String>),
}

struct TrackerState {
    width: u32,
    height: u32,
    thresholds: ThresholdTable,
    bucket: usize,
    snapshot: ContextSnapshot,
}

struct TrackerInner {
    host: HostEnv,
    state: Mutex<TrackerState>,
    emitter: Mutex<EventEmitter>,
}

/// A responsive context tracker bound to a host environment.
///
/// Cloning shares state, in the same way the host-bound signal handlers
/// share it with the constructing caller.
#[derive(Clone)]
pub struct ContextTracker {
    inner: Arc<TrackerInner>,
}

impl ContextTracker {
    /// Construct a tracker, compute the initial bucket and snapshot
    /// synchronously, and bind to the host's change signals.
    ///
    /// A debounced handler is bound to the resize signal always, and to
    /// the orientation-change signal only when the capabilities report
    /// support. Both signals share one rate limiter, so a resize burst
    /// interleaved with rotations still collapses to a leading plus a
    /// trailing evaluation.
    pub fn new(config: Config, host: HostEnv) -> Self {
        let thresholds = ThresholdTable::from_spec(&config.thresholds);

        let dims = host.viewport_size();
        let (width, height) = dims.map(|d| (d.width, d.height)).unwrap_or((0, 0));
        let bucket = thresholds.bucket_index(width);
        let snapshot = build_snapshot(host.capabilities.as_ref(), &thresholds, bucket);

        let inner = Arc::new(TrackerInner {
            host,
            state: Mutex::new(TrackerState {
                width,
                height,
                thresholds,
                bucket,
                snapshot,
            }),
            emitter: Mutex::new(EventEmitter::new()),
        });

        let weak: Weak<TrackerInner> = Arc::downgrade(&inner);
        let debouncer = Debouncer::new(
            inner.host.scheduler.clone(),
            config.debounce,
            move |trigger: Trigger| {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.contextualize(Some(trigger));
                }
            },
        );

        let resize = debouncer.clone();
        inner
            .host
            .signals
            .bind_resize(Arc::new(move |trigger| resize.signal(trigger)));

        if inner.host.capabilities.orientation_events() {
            inner
                .host
                .signals
                .bind_orientation_change(Arc::new(move |trigger| debouncer.signal(trigger)));
        }

        Self { inner }
    }

    /// Run one evaluation pass.
    ///
    /// Usually invoked through the rate-limited signal handlers; calling
    /// it directly (with `Trigger::Manual` or no trigger) bypasses the
    /// rate limiter. Re-running with unchanged width is a safe no-op for
    /// dispatch purposes.
    pub fn contextualize(&self, trigger: Option<Trigger>) {
        let changed = {
            let mut state = self.inner.state.lock();

            if let Some(dims) = self.inner.host.viewport_size() {
                state.width = dims.width;
                state.height = dims.height;
            }

            let bucket = state.thresholds.bucket_index(state.width);
            if bucket != state.bucket {
                state.bucket = bucket;
                let snapshot = build_snapshot(
                    self.inner.host.capabilities.as_ref(),
                    &state.thresholds,
                    bucket,
                );
                state.snapshot = snapshot.clone();
                Some(snapshot)
            } else {
                None
            }
        };

        match changed {
            Some(snapshot) => {
                tracing::debug!(
                    name = %snapshot.name,
                    threshold = snapshot.threshold,
                    ?trigger,
                    "context changed"
                );
                self.dispatch(&ContextEvent {
                    kind: CHANGE.to_owned(),
                    snapshot: Some(snapshot),
                    trigger,
                });
            }
            None => tracing::trace!(?trigger, "bucket unchanged"),
        }
    }

    /// Register a listener for an event type. The same listener may be
    /// registered multiple times; each registration is dispatched.
    pub fn on(&self, kind: &str, listener: Listener) {
        self.inner.emitter.lock().on(kind, listener);
    }

    /// Remove the first registration of a listener for an event type,
    /// matching by `Arc` identity. No-op when absent.
    pub fn off(&self, kind: &str, listener: &Listener) {
        self.inner.emitter.lock().off(kind, listener);
    }

    /// Insert a new threshold boundary at its sorted position.
    ///
    /// The bucket is not re-evaluated here; the next signal picks up the
    /// new table.
    pub fn add(&self, entry: ThresholdEntry) -> Result<(), ContextError> {
        self.inner.state.lock().thresholds.add(entry)
    }

    /// Read one of the documented fields.
    pub fn value(&self, field: Field) -> FieldValue {
        let state = self.inner.state.lock();
        match field {
            Field::Width => FieldValue::Pixels(state.width),
            Field::Height => FieldValue::Pixels(state.height),
            Field::Thresholds => FieldValue::Widths(state.thresholds.widths().to_vec()),
            Field::ThresholdNames => FieldValue::Names(state.thresholds.names().to_vec()),
            Field::PixelRatio => FieldValue::Ratio(state.snapshot.pixel_ratio),
            Field::Interaction => FieldValue::Interaction(state.snapshot.interaction),
            Field::Name => FieldValue::Name(state.snapshot.name.clone()),
            Field::Threshold => FieldValue::Pixels(state.snapshot.threshold),
        }
    }

    /// The current context snapshot.
    pub fn info(&self) -> ContextSnapshot {
        self.inner.state.lock().snapshot.clone()
    }

    /// Dispatch an event through the listener registry.
    ///
    /// Accepts a bare type name (wrapped into a minimal record) or a
    /// full record. An event with an empty type name is a contract
    /// violation and returns [`ContextError::UnsupportedEvent`]; a type
    /// with no listeners is a no-op. The tracker itself fires only
    /// [`CHANGE`], but listeners and embedders may route their own
    /// events through the same registry.
    pub fn fire(&self, event: impl Into<ContextEvent>) -> Result<(), ContextError> {
        let event = event.into();
        if event.kind.is_empty() {
            return Err(ContextError::UnsupportedEvent(event.kind));
        }
        self.dispatch(&event);
        Ok(())
    }

    fn dispatch(&self, event: &ContextEvent) {
        // Snapshot the sequence so listeners can re-enter on/off without
        // deadlocking on the registry lock. A panicking listener is not
        // caught; it propagates to the signal-delivery caller.
        let listeners = self.inner.emitter.lock().subscribers(&event.kind);
        for listener in listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for ContextTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ContextTracker")
            .field("width", &state.width)
            .field("height", &state.height)
            .field("bucket", &state.bucket)
            .field("snapshot", &state.snapshot)
            .finish()
    }
}

fn build_snapshot(
    capabilities: &dyn Capabilities,
    thresholds: &ThresholdTable,
    bucket: usize,
) -> ContextSnapshot {
    let pixel_ratio = capabilities.pixel_ratio().unwrap_or(1.0);
    let interaction = if capabilities.touch_capable() {
        Interaction::Touch
    } else {
        Interaction::Mouse
    };
    let name = match thresholds.name_at(bucket) {
        Some(name) => BucketName::Named(name.to_owned()),
        None => BucketName::Index(bucket),
    };
    ContextSnapshot {
        pixel_ratio,
        interaction,
        name,
        threshold: thresholds.width_at(bucket),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::sim::SimHost;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tracker_on(host: &SimHost) -> ContextTracker {
        ContextTracker::new(Config::default(), HostEnv::shared(Arc::new(host.clone())))
    }

    fn change_counter(tracker: &ContextTracker) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        tracker.on(
            CHANGE,
            Arc::new(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        count
    }

    #[test]
    fn initial_snapshot_derives_from_construction_width() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);

        let info = tracker.info();
        assert_eq!(info.name, BucketName::Named("mobile".to_owned()));
        assert_eq!(info.threshold, 400);
        assert_eq!(info.pixel_ratio, 1.0);
        assert_eq!(info.interaction, Interaction::Mouse);
    }

    #[test]
    fn construction_does_not_fire_change() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);
        let count = change_counter(&tracker);

        // No signal delivered yet; registration alone fires nothing.
        assert_eq!(count.load(Ordering::SeqCst), 0);
        drop(tracker);
    }

    #[test]
    fn value_exposes_documented_fields() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);

        assert_eq!(tracker.value(Field::Width), FieldValue::Pixels(320));
        assert_eq!(tracker.value(Field::Height), FieldValue::Pixels(480));
        assert_eq!(
            tracker.value(Field::Thresholds),
            FieldValue::Widths(vec![400, 768, 980])
        );
        assert_eq!(
            tracker.value(Field::ThresholdNames),
            FieldValue::Names(vec![
                "mobile".to_owned(),
                "tablet".to_owned(),
                "standard".to_owned()
            ])
        );
        assert_eq!(tracker.value(Field::PixelRatio), FieldValue::Ratio(1.0));
        assert_eq!(
            tracker.value(Field::Name),
            FieldValue::Name(BucketName::Named("mobile".to_owned()))
        );
        assert_eq!(tracker.value(Field::Threshold), FieldValue::Pixels(400));
    }

    #[test]
    fn crossing_a_boundary_fires_once() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);
        let count = change_counter(&tracker);

        host.set_size(800, 600);
        tracker.contextualize(Some(Trigger::Manual));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            tracker.info().name,
            BucketName::Named("standard".to_owned())
        );
    }

    #[test]
    fn unchanged_bucket_updates_dimensions_silently() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);
        let count = change_counter(&tracker);

        host.set_size(350, 500);
        tracker.contextualize(None);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(tracker.value(Field::Width), FieldValue::Pixels(350));
        assert_eq!(tracker.value(Field::Height), FieldValue::Pixels(500));
    }

    #[test]
    fn repeated_contextualize_is_idempotent_for_dispatch() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);
        let count = change_counter(&tracker);

        host.set_size(800, 600);
        tracker.contextualize(None);
        tracker.contextualize(None);
        tracker.contextualize(None);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn snapshot_freezes_until_bucket_changes() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);

        // Pixel ratio drifts without a bucket change: snapshot keeps the
        // value captured at the last rebuild.
        host.set_pixel_ratio(Some(2.0));
        tracker.contextualize(None);
        assert_eq!(tracker.info().pixel_ratio, 1.0);

        host.set_size(800, 600);
        tracker.contextualize(None);
        assert_eq!(tracker.info().pixel_ratio, 2.0);
    }

    #[test]
    fn added_threshold_takes_effect_on_next_evaluation() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);

        tracker.add(ThresholdEntry::named("phablet", 500)).unwrap();
        assert_eq!(
            tracker.value(Field::Thresholds),
            FieldValue::Widths(vec![400, 500, 768, 980])
        );

        host.set_size(450, 700);
        tracker.contextualize(None);
        assert_eq!(tracker.info().name, BucketName::Named("phablet".to_owned()));
        assert_eq!(tracker.info().threshold, 500);
    }

    #[test]
    fn anonymous_table_reports_raw_index() {
        let host = SimHost::new(320, 480);
        let tracker = ContextTracker::new(
            Config::widths(vec![400, 768, 980]),
            HostEnv::shared(Arc::new(host.clone())),
        );

        assert_eq!(tracker.info().name, BucketName::Index(0));

        host.set_size(900, 600);
        tracker.contextualize(None);
        assert_eq!(tracker.info().name, BucketName::Index(2));
        assert_eq!(tracker.info().threshold, 980);
    }

    #[test]
    fn fire_rejects_unresolvable_event_type() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);

        assert_eq!(
            tracker.fire(""),
            Err(ContextError::UnsupportedEvent(String::new()))
        );
    }

    #[test]
    fn fire_without_listeners_is_a_noop() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);
        assert!(tracker.fire("resize").is_ok());
    }

    #[test]
    fn listeners_can_unregister_reentrantly() {
        let host = SimHost::new(320, 480);
        let tracker = tracker_on(&host);
        let count = Arc::new(AtomicUsize::new(0));

        // A listener that removes itself on first dispatch.
        let slot: Arc<Mutex<Option<Listener>>> = Arc::new(Mutex::new(None));
        let count_clone = count.clone();
        let tracker_clone = tracker.clone();
        let slot_clone = slot.clone();
        let listener: Listener = Arc::new(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(own) = slot_clone.lock().take() {
                tracker_clone.off(CHANGE, &own);
            }
        });
        *slot.lock() = Some(listener.clone());
        tracker.on(CHANGE, listener);

        host.set_size(800, 600);
        tracker.contextualize(None);
        host.set_size(320, 480);
        tracker.contextualize(None);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
