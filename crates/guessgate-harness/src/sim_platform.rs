//! Simulated platform implementing the Platform and Driver traits.
//!
//! `SimPlatform` stands in for a browser page: a handful of elements with
//! visibility, text, typed value and listener registrations, a virtual clock,
//! and a one-shot timer queue. Keystrokes are scripted ahead of time and
//! delivered in time order, interleaved with expiring timers.
//!
//! Like a real page, a keystroke on a hidden element is lost, and a
//! keystroke on a visible element without a listener only changes its value.

use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use guessgate_app::{Driver, ElementId, EventKind, HostEvent, InputEvent, Platform, TimerId};
use thiserror::Error;

/// Simulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// An operation or keystroke referred to an element that does not exist.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
}

/// A simulated UI element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimElement {
    /// Whether the element is shown.
    pub visible: bool,
    /// Displayed text.
    pub text: String,
    /// Typed value (transient input).
    pub value: String,
    /// Listener registrations per event kind.
    pub listeners: BTreeMap<String, usize>,
    /// How often the element was reset.
    pub resets: usize,
    /// Enclosing element; resetting a parent clears its children's values.
    pub parent: Option<ElementId>,
}

impl SimElement {
    fn new(parent: Option<ElementId>) -> Self {
        Self { visible: true, parent, ..Self::default() }
    }

    /// Registered listeners for `kind`.
    pub fn listener_count(&self, kind: &str) -> usize {
        self.listeners.get(kind).copied().unwrap_or(0)
    }
}

/// A keystroke scheduled at a virtual time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedInput {
    /// When the key is pressed.
    pub at: Duration,
    /// Element receiving the key.
    pub target: ElementId,
    /// Raised event.
    pub event: InputEvent,
}

/// Deterministic platform and driver.
#[derive(Debug, Default)]
pub struct SimPlatform {
    elements: BTreeMap<ElementId, SimElement>,
    focused: Option<ElementId>,
    now: Duration,
    next_timer: u64,
    /// Keyed by (due time, id) so equal due times fire in scheduling order.
    timers: BTreeMap<(Duration, u64), TimerId>,
    script: VecDeque<ScriptedInput>,
    trace: Vec<String>,
    faults: VecDeque<ElementId>,
    quit: Option<Duration>,
    stopped: bool,
}

impl SimPlatform {
    /// Create an empty platform at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visible element.
    #[must_use]
    pub fn with_element(mut self, id: ElementId, parent: Option<ElementId>) -> Self {
        self.add_element(id, parent);
        self
    }

    /// Add a visible element.
    pub fn add_element(&mut self, id: ElementId, parent: Option<ElementId>) {
        self.elements.insert(id, SimElement::new(parent));
    }

    /// Schedule a keystroke. Keystrokes are kept in time order; equal times
    /// keep insertion order.
    pub fn push_input(&mut self, input: ScriptedInput) {
        let index = self.script.partition_point(|queued| queued.at <= input.at);
        self.script.insert(index, input);
    }

    /// Type `text` into `target`, one `"input"` event per character, the
    /// first now and the rest `interval` apart.
    pub fn type_text(&mut self, target: ElementId, text: &str, interval: Duration) {
        let mut at = self.now;
        for ch in text.chars() {
            self.push_input(ScriptedInput { at, target, event: InputEvent::input(ch.to_string()) });
            at += interval;
        }
    }

    /// Element state, if it exists.
    pub fn element(&self, id: ElementId) -> Option<&SimElement> {
        self.elements.get(&id)
    }

    /// Displayed text of an element.
    pub fn text(&self, id: ElementId) -> &str {
        self.elements.get(&id).map_or("", |element| element.text.as_str())
    }

    /// Typed value of an element.
    pub fn value(&self, id: ElementId) -> &str {
        self.elements.get(&id).map_or("", |element| element.value.as_str())
    }

    /// Registered listeners for `kind` on an element.
    pub fn listener_count(&self, id: ElementId, kind: &str) -> usize {
        self.elements.get(&id).map_or(0, |element| element.listener_count(kind))
    }

    /// Element holding keyboard focus.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Current virtual time.
    pub fn clock(&self) -> Duration {
        self.now
    }

    /// Timers scheduled but not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Keystrokes not yet delivered.
    pub fn pending_inputs(&self) -> usize {
        self.script.len()
    }

    /// Every platform operation so far, one line each.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Ask the runtime to quit at virtual time `at`. Timers and keystrokes
    /// due at the same time are delivered first.
    pub fn quit_at(&mut self, at: Duration) {
        self.quit = Some(at);
    }

    fn log(&mut self, line: String) {
        tracing::trace!("sim: {}", line);
        self.trace.push(format!("t={}ms {line}", self.now.as_millis()));
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut SimElement> {
        if !self.elements.contains_key(&id) {
            self.faults.push_back(id);
            return None;
        }
        self.elements.get_mut(&id)
    }

    /// Deliver a keystroke to its element, returning the host event if a
    /// listener hears it.
    fn press(&mut self, input: ScriptedInput) -> Option<HostEvent> {
        let ScriptedInput { target, event, .. } = input;
        let data = event.data().unwrap_or_default().to_string();

        let heard = match self.element_mut(target) {
            None => return None,
            Some(element) if !element.visible => None,
            Some(element) => {
                if let Some(typed) = event.data() {
                    element.value.push_str(typed);
                }
                Some(element.listener_count(event.kind.as_str()) > 0)
            },
        };

        match heard {
            None => {
                self.log(format!("key {data:?} on hidden {target} lost"));
                None
            },
            Some(false) => {
                self.log(format!("key {data:?} on {target} unheard"));
                None
            },
            Some(true) => {
                self.log(format!("key {data:?} on {target}"));
                Some(HostEvent::Input { target, event })
            },
        }
    }
}

impl Platform for SimPlatform {
    fn set_visible(&mut self, element: ElementId, visible: bool) {
        if let Some(sim) = self.element_mut(element) {
            sim.visible = visible;
        }
        let verb = if visible { "show" } else { "hide" };
        self.log(format!("{verb} {element}"));
    }

    fn is_visible(&self, element: ElementId) -> bool {
        self.elements.get(&element).is_some_and(|sim| sim.visible)
    }

    fn focus(&mut self, element: ElementId) {
        if self.element_mut(element).is_some() {
            self.focused = Some(element);
        }
        self.log(format!("focus {element}"));
    }

    fn add_listener(&mut self, element: ElementId, kind: &EventKind) {
        if let Some(sim) = self.element_mut(element) {
            *sim.listeners.entry(kind.to_string()).or_default() += 1;
        }
        self.log(format!("listen {element} {kind}"));
    }

    fn remove_listener(&mut self, element: ElementId, kind: &EventKind) {
        if let Some(count) =
            self.element_mut(element).and_then(|sim| sim.listeners.get_mut(kind.as_str()))
        {
            *count = count.saturating_sub(1);
        }
        self.log(format!("unlisten {element} {kind}"));
    }

    fn reset(&mut self, element: ElementId) {
        if let Some(sim) = self.element_mut(element) {
            sim.resets += 1;
        }
        for (id, child) in &mut self.elements {
            if *id == element || child.parent == Some(element) {
                child.value.clear();
            }
        }
        self.log(format!("reset {element}"));
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(sim) = self.element_mut(element) {
            sim.text = text.to_string();
        }
        self.log(format!("text {element} {text:?}"));
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.insert((self.now + delay, self.next_timer), id);
        self.log(format!("schedule {id} in {}ms", delay.as_millis()));
        id
    }
}

impl Driver for SimPlatform {
    type Error = SimError;
    type Instant = Duration;

    fn poll_event(&mut self) -> Result<Option<HostEvent>, Self::Error> {
        loop {
            if let Some(element) = self.faults.pop_front() {
                return Err(SimError::UnknownElement(element));
            }
            if self.stopped {
                return Ok(None);
            }

            let next_timer = self.timers.keys().next().map(|&(due, _)| due);
            let next_input = self.script.front().map(|input| input.at);
            if let Some(at) = self.quit
                && next_timer.is_none_or(|due| at < due)
                && next_input.is_none_or(|input| at < input)
            {
                self.quit = None;
                self.now = self.now.max(at);
                self.log("quit".to_string());
                return Ok(Some(HostEvent::Quit));
            }
            let fire_timer = match (next_timer, next_input) {
                (Some(due), Some(at)) => due <= at,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return Ok(None),
            };

            if fire_timer {
                if let Some(((due, _), id)) = self.timers.pop_first() {
                    self.now = self.now.max(due);
                    self.log(format!("{id} fired"));
                    return Ok(Some(HostEvent::TimerFired(id)));
                }
            } else if let Some(input) = self.script.pop_front() {
                self.now = self.now.max(input.at);
                if let Some(event) = self.press(input) {
                    return Ok(Some(event));
                }
            }
        }
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.log("stop".to_string());
    }
}
