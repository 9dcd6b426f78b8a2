use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::timing::Rules;

pub type PlayerId = u64;

pub const STARTING_LIVES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub lives: u8,
    pub last_jump: u64,
}

/// The singleton game record. `last_swing` is unset between startup and the
/// swing controller's first tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub last_swing: Option<u64>,
}

/// What readers see: the game record plus all players, id-ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub game: Game,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    Started,
    /// The previous jump window is still open; the request is a no-op.
    StillAirborne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    UnknownPlayer(PlayerId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UnknownPlayer(id) => write!(f, "unknown player id: {id}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Outcome of one swing tick: the instant the rope hit the floor and who got
/// caught by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwingReport {
    pub swing_at: u64,
    pub penalized: Vec<PlayerId>,
}

#[derive(Debug)]
struct Inner {
    next_player_id: PlayerId,
    players: BTreeMap<PlayerId, Player>,
    game: Game,
}

impl Inner {
    fn fresh() -> Self {
        Self {
            next_player_id: 1,
            players: BTreeMap::new(),
            game: Game::default(),
        }
    }
}

/// Owner of all game state. Holds exactly one `Game` by construction, so the
/// singleton invariant cannot be violated at runtime. Each mutation runs in a
/// single critical section and then publishes a fresh [`WorldSnapshot`] on a
/// watch channel; subscribers get change notifications without re-polling.
#[derive(Debug)]
pub struct GameStore {
    rules: Rules,
    inner: Mutex<Inner>,
    changes: watch::Sender<WorldSnapshot>,
}

impl GameStore {
    pub fn new(rules: Rules) -> Self {
        let (changes, _) = watch::channel(WorldSnapshot::default());
        Self {
            rules,
            inner: Mutex::new(Inner::fresh()),
            changes,
        }
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Startup semantics: drop all players and start over with a fresh game.
    /// Safe to call any number of times.
    pub fn reset(&self) {
        let mut inner = self.lock();
        *inner = Inner::fresh();
        self.publish(&inner);
    }

    /// Creates a player with full lives whose `last_jump` sits exactly one
    /// jump window in the past, so they can jump right away without being
    /// mid-jump.
    pub fn register(&self, now_ms: u64) -> PlayerId {
        let mut inner = self.lock();
        let id = inner.next_player_id;
        inner.next_player_id += 1;
        inner.players.insert(
            id,
            Player {
                id,
                lives: STARTING_LIVES,
                last_jump: now_ms.saturating_sub(self.rules.jump_ms()),
            },
        );
        self.publish(&inner);
        id
    }

    /// Sets `last_jump` iff the player is grounded. Check and write happen
    /// under one lock, so concurrent duplicate requests cannot both start a
    /// jump.
    pub fn jump(&self, id: PlayerId, now_ms: u64) -> Result<JumpOutcome, StoreError> {
        let mut inner = self.lock();
        let player = inner
            .players
            .get_mut(&id)
            .ok_or(StoreError::UnknownPlayer(id))?;
        if self.rules.is_airborne(player.last_jump, now_ms) {
            return Ok(JumpOutcome::StillAirborne);
        }
        player.last_jump = now_ms;
        self.publish(&inner);
        Ok(JumpOutcome::Started)
    }

    /// Advances the rope: records the swing instant and decrements `lives`
    /// for every live player who was not airborne at that instant. The whole
    /// sweep is one critical section, so a jump can never land between the
    /// swing write and the penalty pass.
    pub fn swing(&self, now_ms: u64) -> SwingReport {
        let mut inner = self.lock();
        // `last_swing` never moves backwards, whatever the wall clock does.
        let swing_at = match inner.game.last_swing {
            Some(prev) => now_ms.max(prev),
            None => now_ms,
        };
        inner.game.last_swing = Some(swing_at);

        let mut penalized = Vec::new();
        for player in inner.players.values_mut() {
            if player.lives > 0 && !self.rules.is_airborne(player.last_jump, swing_at) {
                player.lives -= 1;
                penalized.push(player.id);
            }
        }
        self.publish(&inner);
        SwingReport { swing_at, penalized }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.changes.borrow().clone()
    }

    /// Live-query subscription: the receiver always holds the latest
    /// snapshot and wakes on every change.
    pub fn subscribe(&self) -> watch::Receiver<WorldSnapshot> {
        self.changes.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("game store lock should be available")
    }

    fn publish(&self, inner: &Inner) {
        self.changes.send_replace(WorldSnapshot {
            game: inner.game,
            players: inner.players.values().copied().collect(),
        });
    }
}
