//! Recording platform for unit tests.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use crate::{Driver, ElementId, EventKind, HostEvent, Platform, TimerId};

pub(crate) const FORM: ElementId = ElementId(1);
pub(crate) const SURFACE: ElementId = ElementId(2);
pub(crate) const RESULTS: ElementId = ElementId(3);

/// Records every platform call as a short line.
#[derive(Debug, Default)]
pub(crate) struct RecordingPlatform {
    pub ops: Vec<String>,
    pub hidden: HashSet<ElementId>,
    pub listeners: HashMap<(ElementId, String), usize>,
    pub focused: Option<ElementId>,
    pub texts: HashMap<ElementId, String>,
    pub timers: Vec<(TimerId, Duration)>,
}

impl RecordingPlatform {
    pub fn listener_count(&self, element: ElementId, kind: &str) -> usize {
        self.listeners.get(&(element, kind.to_string())).copied().unwrap_or(0)
    }

    pub fn text(&self, element: ElementId) -> &str {
        self.texts.get(&element).map_or("", String::as_str)
    }

    pub fn take_ops(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ops)
    }
}

impl Platform for RecordingPlatform {
    fn set_visible(&mut self, element: ElementId, visible: bool) {
        if visible {
            self.hidden.remove(&element);
            self.ops.push(format!("show {element}"));
        } else {
            self.hidden.insert(element);
            self.ops.push(format!("hide {element}"));
        }
    }

    fn is_visible(&self, element: ElementId) -> bool {
        !self.hidden.contains(&element)
    }

    fn focus(&mut self, element: ElementId) {
        self.focused = Some(element);
        self.ops.push(format!("focus {element}"));
    }

    fn add_listener(&mut self, element: ElementId, kind: &EventKind) {
        *self.listeners.entry((element, kind.to_string())).or_default() += 1;
        self.ops.push(format!("listen {element} {kind}"));
    }

    fn remove_listener(&mut self, element: ElementId, kind: &EventKind) {
        if let Some(count) = self.listeners.get_mut(&(element, kind.to_string())) {
            *count = count.saturating_sub(1);
        }
        self.ops.push(format!("unlisten {element} {kind}"));
    }

    fn reset(&mut self, element: ElementId) {
        self.ops.push(format!("reset {element}"));
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.texts.insert(element, text.to_string());
        self.ops.push(format!("text {element} {text:?}"));
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.timers.len() as u64 + 1);
        self.timers.push((id, delay));
        self.ops.push(format!("schedule {id} in {}ms", delay.as_millis()));
        id
    }
}

/// Driver replaying a fixed list of host events over a [`RecordingPlatform`].
#[derive(Debug, Default)]
pub(crate) struct ScriptedDriver {
    pub platform: RecordingPlatform,
    pub events: std::collections::VecDeque<Result<HostEvent, ScriptError>>,
    pub stopped: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("script error")]
pub(crate) struct ScriptError;

impl ScriptedDriver {
    pub fn new(events: impl IntoIterator<Item = HostEvent>) -> Self {
        Self { events: events.into_iter().map(Ok).collect(), ..Self::default() }
    }
}

impl Platform for ScriptedDriver {
    fn set_visible(&mut self, element: ElementId, visible: bool) {
        self.platform.set_visible(element, visible);
    }

    fn is_visible(&self, element: ElementId) -> bool {
        self.platform.is_visible(element)
    }

    fn focus(&mut self, element: ElementId) {
        self.platform.focus(element);
    }

    fn add_listener(&mut self, element: ElementId, kind: &EventKind) {
        self.platform.add_listener(element, kind);
    }

    fn remove_listener(&mut self, element: ElementId, kind: &EventKind) {
        self.platform.remove_listener(element, kind);
    }

    fn reset(&mut self, element: ElementId) {
        self.platform.reset(element);
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.platform.set_text(element, text);
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        self.platform.schedule_once(delay)
    }
}

impl Driver for ScriptedDriver {
    type Error = ScriptError;
    type Instant = Duration;

    fn poll_event(&mut self) -> Result<Option<HostEvent>, Self::Error> {
        self.events.pop_front().transpose()
    }

    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
