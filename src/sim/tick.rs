//! Frame-stepped simulation tick
//!
//! One call advances the game by a single frame in a fixed order: movement,
//! collision, laser resolution, then pickups and mirror placement.

use rand::Rng;

use super::character::CharacterAction;
use super::state::{GameEvent, GameState, GameStatus};
use crate::consts::{MAIN_OBJECTIVE_SCORE, PAINTING_SCORE_MAX};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub forward: bool,
    pub backward: bool,
    /// Grab a painting or pick a mirror back up
    pub grab: bool,
    /// Drop a mirror in front of the thief
    pub place_mirror: bool,
}

impl TickInput {
    /// The single movement action this frame, by priority
    pub fn action(&self) -> Option<CharacterAction> {
        if self.rotate_left {
            Some(CharacterAction::RotateLeft)
        } else if self.rotate_right {
            Some(CharacterAction::RotateRight)
        } else if self.forward {
            Some(CharacterAction::Forward)
        } else if self.backward {
            Some(CharacterAction::Backward)
        } else {
            None
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.status.is_finished() {
        return events;
    }
    state.time_ticks += 1;

    if let Some(action) = input.action() {
        state.player.move_action(action);
    }

    let blocked = state
        .layers
        .walls
        .iter()
        .chain(&state.layers.obstacles)
        .any(|s| state.player.collides_with(s));
    state.player.update(!blocked);

    let points = state.obstruction_points();
    let mut caught_by = None;
    for (i, laser) in state.lasers.iter_mut().enumerate() {
        if laser.resolve(&points) == Some(0) && caught_by.is_none() {
            caught_by = Some(i);
        }
    }
    if let Some(laser) = caught_by {
        state.status = GameStatus::Caught;
        log::info!("Caught by laser {} after {} ticks", laser, state.time_ticks);
        events.push(GameEvent::Caught { laser });
        return events;
    }

    if input.grab {
        grab(state, &mut events);
    }

    if input.place_mirror {
        match state.place_mirror() {
            Some(id) => events.push(GameEvent::MirrorPlaced { id }),
            None => log::debug!("No mirrors left to place"),
        }
    }

    for event in &events {
        log::debug!("{:?}", event);
    }
    events
}

/// Collect the first painting in reach, else the first mirror in reach
fn grab(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = &state.player;
    if let Some(index) = state.paintings.iter().position(|p| player.close_to(p)) {
        let painting = state.paintings.remove(index);
        let points = if painting.is_main_objective() {
            state.status = GameStatus::Won;
            log::info!("Main objective collected");
            MAIN_OBJECTIVE_SCORE
        } else {
            state.rng.random_range(0..=PAINTING_SCORE_MAX)
        };
        state.score += points;
        events.push(GameEvent::PaintingCollected {
            points,
            main_objective: painting.is_main_objective(),
        });
        return;
    }

    let nearby = state
        .mirrors
        .iter()
        .position(|m| player.close_to_sprite(&m.sprite));
    if let Some(id) = nearby.and_then(|index| state.collect_mirror(index)) {
        events.push(GameEvent::MirrorCollected { id });
    }
}
