//! Event Bus - typed replacement for fire-and-forget messages
//!
//! Systems emit events to the bus; consumers (the event logger, the scenario
//! runner, the headless binary) drain them. Nobody has to be listening.

use bevy::prelude::*;

use super::types::GameEvent;

/// Timestamped event for the event bus
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Fixed-clock time in milliseconds
    pub time_ms: u32,
    /// Simulation tick the event was emitted on
    pub tick: u64,
    pub event: GameEvent,
}

/// Central event bus for cross-module communication
#[derive(Resource, Default)]
pub struct EventBus {
    /// Events emitted but not yet drained
    pending: Vec<BusEvent>,

    /// Current time in milliseconds (for timestamping)
    elapsed_ms: u32,

    /// Current simulation tick
    tick: u64,

    /// Whether the bus is enabled (for testing/simulation)
    enabled: bool,
}

impl EventBus {
    /// Create a new enabled event bus
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Create a disabled event bus (events are dropped)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Advance the bus clock (called once per fixed tick)
    pub fn begin_tick(&mut self, tick: u64, elapsed_secs: f32) {
        self.tick = tick;
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    /// Emit an event to the bus
    pub fn emit(&mut self, event: GameEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            tick: self.tick,
            event,
        });
    }

    /// Emit multiple events at once
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    /// Get pending events for consumption (does not drain)
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Take all pending events
    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Simulation tick counter, advanced at the start of every fixed step
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct TickCounter(pub u64);

/// First system of the fixed step: count the tick and stamp the bus
pub fn begin_tick(
    mut counter: ResMut<TickCounter>,
    mut bus: ResMut<EventBus>,
    time: Res<Time<Fixed>>,
) {
    counter.0 += 1;
    bus.begin_tick(counter.0, time.elapsed_secs());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerSlot;

    #[test]
    fn test_emit_and_drain() {
        let mut bus = EventBus::new();
        bus.begin_tick(75, 1.5);

        bus.emit(GameEvent::Jump {
            player: PlayerSlot::One,
        });

        assert_eq!(bus.pending_count(), 1);
        assert!(bus.has_pending());

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time_ms, 1500);
        assert_eq!(events[0].tick, 75);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_disabled_bus() {
        let mut bus = EventBus::disabled();
        bus.emit(GameEvent::Land {
            player: PlayerSlot::Two,
        });
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_emit_all_keeps_order() {
        let mut bus = EventBus::new();
        bus.emit_all([
            GameEvent::Jump {
                player: PlayerSlot::One,
            },
            GameEvent::Fall {
                player: PlayerSlot::Two,
            },
        ]);
        let names: Vec<_> = bus.peek().iter().map(|e| e.event.name()).collect();
        assert_eq!(names, vec!["Jump", "Fall"]);
    }
}
