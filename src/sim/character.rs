//! The player-controlled thief
//!
//! Movement is two-phase: `move_action` proposes a displacement, the tick
//! tests the proposed position against walls and obstacles, then `update`
//! commits or rejects it. The sprite is never moved before that decision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::painting::Painting;
use super::sprite::Sprite;
use crate::consts::{COLLISION_FACTOR, PROXIMITY_FACTOR, ROTATION_STEP, STEP_DISTANCE};

/// Discrete input actions for the thief
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterAction {
    RotateLeft,
    RotateRight,
    Forward,
    Backward,
}

/// Movement state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MoveState {
    #[default]
    Idle,
    /// One displacement queued, waiting for `update`
    MovePending { displacement: Vec2 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    sprite: Sprite,
    state: MoveState,
}

impl Character {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            state: MoveState::Idle,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.sprite.pos()
    }

    pub fn rotation(&self) -> i32 {
        self.sprite.rotation()
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_move_pending(&self) -> bool {
        matches!(self.state, MoveState::MovePending { .. })
    }

    /// Queue an action. Ignored while a displacement is pending.
    pub fn move_action(&mut self, action: CharacterAction) {
        if self.is_move_pending() {
            return;
        }

        match action {
            CharacterAction::RotateLeft => self.sprite.set_rot(ROTATION_STEP),
            CharacterAction::RotateRight => self.sprite.set_rot(-ROTATION_STEP),
            CharacterAction::Forward => {
                self.state = MoveState::MovePending {
                    displacement: self.sprite.facing() * STEP_DISTANCE,
                };
            }
            CharacterAction::Backward => {
                self.state = MoveState::MovePending {
                    displacement: -self.sprite.facing() * STEP_DISTANCE,
                };
            }
        }
    }

    /// Where the thief would stand if the pending move were committed
    pub fn proposed_position(&self) -> Vec2 {
        match self.state {
            MoveState::MovePending { displacement } => self.sprite.pos() + displacement,
            MoveState::Idle => self.sprite.pos(),
        }
    }

    /// Commit (`permitted`) or reject the pending move.
    ///
    /// A rejected move applies the negated displacement, nudging the thief
    /// away from its pre-move position. No-op when idle.
    pub fn update(&mut self, permitted: bool) {
        if let MoveState::MovePending { displacement } = self.state {
            if permitted {
                self.sprite.translate(displacement);
            } else {
                self.sprite.translate(-displacement);
            }
            self.state = MoveState::Idle;
        }
    }

    /// Hard collision of the proposed position with a static sprite
    pub fn collides_with(&self, other: &Sprite) -> bool {
        self.sprite
            .collides_at(self.proposed_position(), other, COLLISION_FACTOR)
    }

    /// Within grabbing range of any tile of the painting
    pub fn close_to(&self, painting: &Painting) -> bool {
        painting.sprites().iter().any(|s| self.close_to_sprite(s))
    }

    /// Within grabbing range of a single sprite
    pub fn close_to_sprite(&self, other: &Sprite) -> bool {
        self.sprite.collides_with(other, PROXIMITY_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::painting::Orientation;
    use crate::sim::sprite::{TextureKey, UvRect};

    const SIZE: f32 = 0.075;

    fn thief_at(pos: Vec2) -> Character {
        Character::new(Sprite::new(pos, SIZE, SIZE, TextureKey::Player, UvRect::FULL))
    }

    fn tile_at(pos: Vec2) -> Sprite {
        Sprite::new(pos, 0.05, 0.05, TextureKey::Tilesheet, UvRect::FULL)
    }

    #[test]
    fn test_rotation_is_immediate() {
        let mut c = thief_at(Vec2::ZERO);
        c.move_action(CharacterAction::RotateLeft);
        assert_eq!(c.rotation(), 10);
        assert!(!c.is_move_pending());
        c.move_action(CharacterAction::RotateRight);
        c.move_action(CharacterAction::RotateRight);
        assert_eq!(c.rotation(), 350);
    }

    #[test]
    fn test_forward_commit_moves_once() {
        let mut c = thief_at(Vec2::ZERO);
        c.move_action(CharacterAction::Forward);
        assert!(c.is_move_pending());
        assert_eq!(c.pos(), Vec2::ZERO);

        // Second request while pending is ignored
        c.move_action(CharacterAction::Forward);
        c.update(true);
        assert!((c.pos() - Vec2::new(STEP_DISTANCE, 0.0)).length() < 1e-6);
        assert!(!c.is_move_pending());

        // Idle update does nothing
        c.update(true);
        assert!((c.pos() - Vec2::new(STEP_DISTANCE, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_rejected_move_applies_negated_displacement() {
        let mut c = thief_at(Vec2::ZERO);
        c.move_action(CharacterAction::Forward);
        c.update(false);
        assert!((c.pos() - Vec2::new(-STEP_DISTANCE, 0.0)).length() < 1e-6);
        assert!(!c.is_move_pending());
    }

    #[test]
    fn test_backward_follows_facing() {
        let mut c = thief_at(Vec2::ZERO);
        for _ in 0..9 {
            c.move_action(CharacterAction::RotateLeft);
        }
        c.move_action(CharacterAction::Backward);
        c.update(true);
        assert!((c.pos() - Vec2::new(0.0, -STEP_DISTANCE)).length() < 1e-6);
    }

    #[test]
    fn test_rotation_ignored_while_pending() {
        let mut c = thief_at(Vec2::ZERO);
        c.move_action(CharacterAction::Forward);
        c.move_action(CharacterAction::RotateLeft);
        assert_eq!(c.rotation(), 0);
    }

    #[test]
    fn test_collides_checks_proposed_position() {
        let half = SIZE / 2.0;
        // Wall just outside collision range of the current position
        let wall = tile_at(Vec2::new(half * 1.5 + 0.005, 0.0));
        let mut c = thief_at(Vec2::ZERO);
        assert!(!c.collides_with(&wall));
        c.move_action(CharacterAction::Forward);
        assert!(c.collides_with(&wall));
    }

    #[test]
    fn test_close_to_painting_threshold() {
        let half = SIZE / 2.0;
        let c = thief_at(Vec2::ZERO);

        let near = Painting::new(
            vec![tile_at(Vec2::new(half * 2.4, 0.0))],
            Orientation::Single,
            false,
        );
        let far = Painting::new(
            vec![tile_at(Vec2::new(half * 2.6, 0.0))],
            Orientation::Single,
            false,
        );
        assert!(c.close_to(&near));
        assert!(!c.close_to(&far));
    }

    #[test]
    fn test_close_to_any_painting_tile() {
        let half = SIZE / 2.0;
        let c = thief_at(Vec2::ZERO);
        let painting = Painting::new(
            vec![
                tile_at(Vec2::new(half * 5.0, 0.0)),
                tile_at(Vec2::new(half * 2.0, 0.0)),
            ],
            Orientation::Horizontal,
            true,
        );
        assert!(c.close_to(&painting));
    }
}
