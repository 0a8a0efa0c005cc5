#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] wraps a [`StepHost`] and records every host input
//! (registrations, events, time steps) together with the lifecycle
//! transitions they produced. [`replay`] feeds the recorded inputs through a
//! fresh host and checks that the transition log comes out identical.
//!
//! # Trace format
//!
//! JSON Lines, one [`TraceRecord`] per line, tagged by `"event"`:
//!
//! - **header**: schema version, initial viewport, presentation options.
//! - **register** / **unregister**: overlay registry changes.
//! - **input**: a host event.
//! - **tick**: the clock moved to `ts_ns`.
//! - **step**: the host ran one step.
//! - **transition**: a lifecycle change observed while recording.
//! - **summary**: transition count and FNV-1a hash of the transition log.
//!
//! # Determinism contract
//!
//! Time only advances through tick records and events are replayed in their
//! recorded order, so the same inputs always produce the same transitions.

use core::time::Duration;

use berth_core::config::OverlayConfig;
use berth_core::event::{Event, OverlayId};
use berth_overlay::{LifecycleChange, OverlayOptions, OverlayState, Variant};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::WebHostError;
use crate::step_host::{HostTransition, StepHost, StepResult};

/// Schema version for session traces.
pub const SCHEMA_VERSION: &str = "berth-trace-v1";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn state_code(state: OverlayState) -> u8 {
    match state {
        OverlayState::Unmounted => 0,
        OverlayState::Mounting => 1,
        OverlayState::Visible => 2,
        OverlayState::Dismissing => 3,
    }
}

/// FNV-1a hash over a transition log.
#[must_use]
pub fn transition_hash(transitions: &[HostTransition]) -> u64 {
    transitions.iter().fold(FNV_OFFSET_BASIS, |hash, t| {
        let hash = fnv1a64_bytes(hash, &t.overlay.0.to_le_bytes());
        let hash = fnv1a64_bytes(hash, &[state_code(t.change.from), state_code(t.change.to)]);
        fnv1a64_bytes(hash, &ts_ns(t.change.at).to_le_bytes())
    })
}

fn ts_ns(at: Duration) -> u64 {
    u64::try_from(at.as_nanos()).unwrap_or(u64::MAX)
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Session header (must be first).
    Header {
        schema_version: String,
        width: u32,
        height: u32,
        config: OverlayConfig,
    },
    /// Overlay registered.
    Register {
        ts_ns: u64,
        overlay: OverlayId,
        variant: Variant,
        options: OverlayOptions,
    },
    /// Overlay removed (abnormal teardown).
    Unregister { ts_ns: u64, overlay: OverlayId },
    /// Host event pushed.
    Input { ts_ns: u64, data: Event },
    /// Clock moved to `ts_ns`.
    Tick { ts_ns: u64 },
    /// Host step.
    Step { ts_ns: u64 },
    /// Observed lifecycle transition.
    Transition {
        overlay: OverlayId,
        from: OverlayState,
        to: OverlayState,
        ts_ns: u64,
    },
    /// Trace summary (must be last).
    Summary { transitions: u64, transition_hash: u64 },
}

impl TraceRecord {
    fn transition(t: &HostTransition) -> Self {
        Self::Transition {
            overlay: t.overlay,
            from: t.change.from,
            to: t.change.to,
            ts_ns: ts_ns(t.change.at),
        }
    }

    fn as_transition(&self) -> Option<HostTransition> {
        match *self {
            Self::Transition {
                overlay,
                from,
                to,
                ts_ns,
            } => Some(HostTransition {
                overlay,
                change: LifecycleChange {
                    from,
                    to,
                    at: Duration::from_nanos(ts_ns),
                },
            }),
            _ => None,
        }
    }
}

/// A complete recorded session trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Transitions observed while recording.
    #[must_use]
    pub fn transitions(&self) -> Vec<HostTransition> {
        self.records
            .iter()
            .filter_map(TraceRecord::as_transition)
            .collect()
    }

    /// Validate structural invariants:
    /// - exactly one header, first
    /// - exactly one summary, last
    /// - summary count and hash match the transition records
    pub fn validate(&self) -> Result<(), WebHostError> {
        let Some(TraceRecord::Header { schema_version, .. }) = self.records.first() else {
            return Err(WebHostError::InvalidTrace("header must be the first record"));
        };
        if schema_version != SCHEMA_VERSION {
            return Err(WebHostError::InvalidTrace("unsupported schema version"));
        }
        let Some(&TraceRecord::Summary {
            transitions,
            transition_hash: hash,
        }) = self.records.last()
        else {
            return Err(WebHostError::InvalidTrace("summary must be the last record"));
        };
        let inner = &self.records[1..self.records.len() - 1];
        if inner
            .iter()
            .any(|r| matches!(r, TraceRecord::Header { .. } | TraceRecord::Summary { .. }))
        {
            return Err(WebHostError::InvalidTrace(
                "header and summary must appear exactly once",
            ));
        }
        let recorded = self.transitions();
        if recorded.len() as u64 != transitions {
            return Err(WebHostError::InvalidTrace(
                "summary transition count does not match",
            ));
        }
        if transition_hash(&recorded) != hash {
            return Err(WebHostError::InvalidTrace(
                "summary transition hash does not match",
            ));
        }
        Ok(())
    }

    /// Serialize to JSON Lines.
    pub fn to_jsonl(&self) -> Result<String, WebHostError> {
        let mut out = String::new();
        for (idx, record) in self.records.iter().enumerate() {
            let line = serde_json::to_string(record).map_err(|e| WebHostError::TraceParse {
                line: idx + 1,
                message: e.to_string(),
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse JSON Lines. Blank lines are skipped.
    pub fn from_jsonl(input: &str) -> Result<Self, WebHostError> {
        let records = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| WebHostError::TraceParse {
                    line: idx + 1,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<TraceRecord>, _>>()?;
        Ok(Self { records })
    }

    /// Parse JSON Lines and validate.
    pub fn from_jsonl_validated(input: &str) -> Result<Self, WebHostError> {
        let trace = Self::from_jsonl(input)?;
        trace.validate()?;
        Ok(trace)
    }
}

/// Records a session for deterministic replay.
pub struct SessionRecorder {
    host: StepHost,
    records: Vec<TraceRecord>,
    transitions: Vec<HostTransition>,
}

impl SessionRecorder {
    /// Create a recorder around a fresh host.
    #[must_use]
    pub fn new(config: OverlayConfig, width: u32, height: u32) -> Self {
        let records = vec![TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_string(),
            width,
            height,
            config: config.clone(),
        }];
        Self {
            host: StepHost::new(config, width, height),
            records,
            transitions: Vec::new(),
        }
    }

    /// Register an overlay and record it.
    pub fn register(
        &mut self,
        id: OverlayId,
        variant: Variant,
        options: OverlayOptions,
    ) -> Result<(), WebHostError> {
        self.host.register(id, variant, options)?;
        self.records.push(TraceRecord::Register {
            ts_ns: ts_ns(self.host.now()),
            overlay: id,
            variant,
            options,
        });
        Ok(())
    }

    /// Unregister an overlay and record it with any teardown transition.
    pub fn unregister(&mut self, id: OverlayId) -> Result<(), WebHostError> {
        self.host.unregister(id)?;
        self.records.push(TraceRecord::Unregister {
            ts_ns: ts_ns(self.host.now()),
            overlay: id,
        });
        self.flush_transitions();
        Ok(())
    }

    /// Record an event.
    pub fn push_event(&mut self, event: Event) {
        self.records.push(TraceRecord::Input {
            ts_ns: ts_ns(self.host.now()),
            data: event,
        });
        self.host.push_event(event);
    }

    /// Record a time advancement.
    pub fn advance_time(&mut self, dt: Duration) {
        self.host.advance_time(dt);
        self.records.push(TraceRecord::Tick {
            ts_ns: ts_ns(self.host.now()),
        });
    }

    /// Run one step and record the transitions it produced.
    pub fn step(&mut self) -> Result<StepResult, WebHostError> {
        let result = self.host.step()?;
        self.records.push(TraceRecord::Step {
            ts_ns: ts_ns(self.host.now()),
        });
        self.flush_transitions();
        Ok(result)
    }

    /// The recorded host.
    #[must_use]
    pub fn host(&self) -> &StepHost {
        &self.host
    }

    /// Finish recording and return the completed trace.
    #[must_use]
    pub fn finish(mut self) -> SessionTrace {
        self.flush_transitions();
        self.records.push(TraceRecord::Summary {
            transitions: self.transitions.len() as u64,
            transition_hash: transition_hash(&self.transitions),
        });
        SessionTrace {
            records: self.records,
        }
    }

    fn flush_transitions(&mut self) {
        let new = self.host.take_transitions();
        self.records.extend(new.iter().map(TraceRecord::transition));
        self.transitions.extend(new);
    }
}

/// Outcome of [`replay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Transitions in the recording.
    pub expected: usize,
    /// Transitions produced by replay.
    pub actual: usize,
    /// Index of the first differing transition, if any.
    pub first_mismatch: Option<usize>,
    /// Hash of the replayed transition log.
    pub actual_hash: u64,
}

impl ReplayResult {
    /// Whether replay reproduced the recording exactly.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }

    /// Convert a mismatch into an error.
    pub fn into_result(self) -> Result<Self, WebHostError> {
        match self.first_mismatch {
            None => Ok(self),
            Some(index) => Err(WebHostError::ReplayMismatch {
                index,
                expected: self.expected,
                actual: self.actual,
            }),
        }
    }
}

/// Replay a trace through a fresh host and compare transition logs.
pub fn replay(trace: &SessionTrace) -> Result<ReplayResult, WebHostError> {
    let Some(TraceRecord::Header {
        width,
        height,
        config,
        ..
    }) = trace.records.first()
    else {
        return Err(WebHostError::InvalidTrace("header must be the first record"));
    };
    let mut host = StepHost::new(config.clone(), *width, *height);

    for record in &trace.records[1..] {
        match record {
            TraceRecord::Register {
                overlay,
                variant,
                options,
                ..
            } => host.register(*overlay, *variant, *options)?,
            TraceRecord::Unregister { overlay, .. } => host.unregister(*overlay)?,
            TraceRecord::Input { data, .. } => host.push_event(*data),
            TraceRecord::Tick { ts_ns } => host.set_time(Duration::from_nanos(*ts_ns)),
            TraceRecord::Step { .. } => {
                host.step()?;
            }
            TraceRecord::Header { .. }
            | TraceRecord::Transition { .. }
            | TraceRecord::Summary { .. } => {}
        }
    }

    let expected = trace.transitions();
    let actual = host.transitions();
    let first_mismatch = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())));

    debug!(
        expected = expected.len(),
        actual = actual.len(),
        ok = first_mismatch.is_none(),
        "session replayed"
    );

    Ok(ReplayResult {
        expected: expected.len(),
        actual: actual.len(),
        first_mismatch,
        actual_hash: transition_hash(actual),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn record_open_close() -> SessionTrace {
        let id = OverlayId::new(1);
        let mut rec = SessionRecorder::new(OverlayConfig::default(), 1024, 768);
        rec.register(id, Variant::Responsive, OverlayOptions::default())
            .unwrap();
        rec.push_event(Event::Open(id));
        rec.step().unwrap();
        rec.advance_time(ms(50));
        rec.step().unwrap();
        rec.push_event(Event::Close(id));
        rec.step().unwrap();
        rec.advance_time(ms(300));
        rec.step().unwrap();
        rec.finish()
    }

    #[test]
    fn recorded_trace_validates() {
        let trace = record_open_close();
        trace.validate().unwrap();
        assert_eq!(trace.transitions().len(), 4);
    }

    #[test]
    fn jsonl_roundtrip_preserves_records() {
        let trace = record_open_close();
        let text = trace.to_jsonl().unwrap();
        assert!(text.lines().next().unwrap().contains("\"event\":\"header\""));
        let parsed = SessionTrace::from_jsonl_validated(&text).unwrap();
        assert_eq!(parsed, trace);
    }

    #[test]
    fn replay_reproduces_transitions() {
        let trace = record_open_close();
        let result = replay(&trace).unwrap();
        assert!(result.ok());
        assert_eq!(result.expected, 4);
        assert_eq!(result.actual_hash, transition_hash(&trace.transitions()));
    }

    #[test]
    fn tampered_trace_fails_validation_and_replay() {
        let mut trace = record_open_close();
        let idx = trace
            .records
            .iter()
            .position(|r| matches!(r, TraceRecord::Transition { .. }))
            .unwrap();
        trace.records.remove(idx);
        assert!(matches!(
            trace.validate(),
            Err(WebHostError::InvalidTrace(_))
        ));
        let result = replay(&trace).unwrap();
        assert_eq!(result.first_mismatch, Some(0));
        assert!(matches!(
            result.into_result(),
            Err(WebHostError::ReplayMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn parse_error_reports_line() {
        let err = SessionTrace::from_jsonl("{\"event\":\"tick\",\"ts_ns\":0}\nnot json\n").unwrap_err();
        assert!(matches!(err, WebHostError::TraceParse { line: 2, .. }));
    }
}
