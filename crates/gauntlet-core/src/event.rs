//! Match events for telemetry.
//!
//! Stages record what happened during a tick as [`MatchEvent`]s. Events never
//! feed back into the simulation; they exist for hosts that drive effects,
//! replays or analytics. Drain them with
//! [`Simulation::drain_events`](crate::simulation::Simulation::drain_events).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::archetype::ArchetypeId;
use crate::buff::BuffKind;
use crate::entity::EntityId;
use crate::pickup::PickupKind;
use crate::state::MatchState;
use crate::weapon::WeaponId;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// The match state machine changed state.
    StateChanged {
        /// State before.
        from: MatchState,
        /// State after.
        to: MatchState,
    },
    /// An enemy entered the arena.
    EnemySpawned {
        /// New enemy.
        enemy: EntityId,
        /// Its archetype.
        archetype: ArchetypeId,
        /// Spawn position.
        position: Vec2,
    },
    /// An enemy died.
    EnemyKilled {
        /// Dead enemy.
        enemy: EntityId,
        /// Its archetype.
        archetype: ArchetypeId,
        /// Score delta awarded.
        points: i32,
    },
    /// A pickup appeared.
    PickupSpawned {
        /// New pickup.
        pickup: EntityId,
        /// What it grants.
        kind: PickupKind,
    },
    /// A player collected a pickup.
    PickupCollected {
        /// Collecting player.
        player: EntityId,
        /// What it granted.
        kind: PickupKind,
    },
    /// A projectile was fired.
    ProjectileFired {
        /// New projectile.
        projectile: EntityId,
        /// Shooter.
        shooter: EntityId,
        /// Damage on hit.
        damage: f32,
    },
    /// A player lost health.
    PlayerHit {
        /// Damaged player.
        player: EntityId,
        /// Health lost.
        damage: f32,
        /// Health remaining.
        health: f32,
    },
    /// A hit was evaded by stance.
    AttackEvaded {
        /// Player who evaded.
        player: EntityId,
    },
    /// A hit was soaked by the shield.
    ShieldAbsorbed {
        /// Shielded player.
        player: EntityId,
        /// Damage soaked.
        amount: f32,
        /// Shield pool remaining.
        remaining: f32,
    },
    /// A shield was broken by damage.
    ShieldBroken {
        /// Player whose shield broke.
        player: EntityId,
    },
    /// A player died.
    PlayerDied {
        /// Dead player.
        player: EntityId,
    },
    /// A player came back at the spawn point.
    PlayerRespawned {
        /// Respawned player.
        player: EntityId,
        /// Invulnerable for ticks before this one.
        invulnerable_until: u64,
    },
    /// A limited weapon ran out of uses.
    WeaponSpent {
        /// Holder.
        player: EntityId,
        /// Spent weapon.
        weapon: WeaponId,
    },
    /// A spent weapon was swapped for the default weapon.
    WeaponReverted {
        /// Holder.
        player: EntityId,
        /// Default weapon now held.
        weapon: WeaponId,
    },
    /// A buff lapsed.
    BuffExpired {
        /// Player who held it.
        player: EntityId,
        /// Lapsed buff.
        kind: BuffKind,
    },
}

/// An event stamped with the tick it happened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Tick index.
    pub tick: u64,
    /// What happened.
    pub event: MatchEvent,
}

/// Append-only log of events since the last drain.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event.
    pub fn push(&mut self, tick: u64, event: MatchEvent) {
        self.records.push(EventRecord { tick, event });
    }

    /// Drains and returns all recorded events in recording order.
    pub fn take(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Returns the number of events currently in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_in_order() {
        let mut log = EventLog::new();
        log.push(1, MatchEvent::PlayerDied { player: EntityId::new(0) });
        log.push(
            2,
            MatchEvent::AttackEvaded {
                player: EntityId::new(0),
            },
        );
        assert_eq!(log.len(), 2);

        let drained = log.take();
        assert_eq!(drained[0].tick, 1);
        assert!(matches!(drained[1].event, MatchEvent::AttackEvaded { .. }));
        assert!(log.is_empty());
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = MatchEvent::BuffExpired {
            player: EntityId::new(4),
            kind: BuffKind::Speed,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"buff_expired","player":4,"kind":"speed"}"#);
    }
}
