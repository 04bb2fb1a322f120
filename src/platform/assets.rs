//! Obstacle sprite readiness gate
//!
//! The start control stays hidden until every obstacle sprite has resolved.
//! A failed load still counts as resolved; that kind is drawn as a placeholder.

use super::PlatformError;
use crate::sim::ObstacleKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteStatus {
    #[default]
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct AssetGate {
    sprites: [SpriteStatus; 4],
}

impl AssetGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a load outcome. Returns `true` if this resolution made the gate
    /// ready. Later results for an already resolved sprite are ignored.
    pub fn resolve(&mut self, kind: ObstacleKind, result: Result<(), PlatformError>) -> bool {
        let was_ready = self.is_ready();
        let slot = &mut self.sprites[kind.index()];
        if *slot != SpriteStatus::Pending {
            log::debug!("Duplicate load result for {} ignored", kind.sprite_key());
            return false;
        }

        *slot = match result {
            Ok(()) => SpriteStatus::Loaded,
            Err(e) => {
                log::warn!("{e}; {} will render as a placeholder", kind.title());
                SpriteStatus::Failed
            }
        };

        let ready = self.is_ready();
        if ready && !was_ready {
            log::info!(
                "Sprites resolved ({} of {} loaded)",
                self.loaded_count(),
                self.sprites.len()
            );
        }
        ready && !was_ready
    }

    pub fn status(&self, kind: ObstacleKind) -> SpriteStatus {
        self.sprites[kind.index()]
    }

    /// Sprite can be drawn
    pub fn is_loaded(&self, kind: ObstacleKind) -> bool {
        self.status(kind) == SpriteStatus::Loaded
    }

    /// Every sprite has succeeded or failed
    pub fn is_ready(&self) -> bool {
        self.sprites.iter().all(|s| *s != SpriteStatus::Pending)
    }

    pub fn loaded_count(&self) -> usize {
        self.sprites
            .iter()
            .filter(|s| **s == SpriteStatus::Loaded)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_after_all_resolve() {
        let mut gate = AssetGate::new();
        assert!(!gate.is_ready());

        assert!(!gate.resolve(ObstacleKind::Solicitor, Ok(())));
        assert!(!gate.resolve(
            ObstacleKind::Marketer,
            Err(PlatformError::ImageLoad("marketer.png".into()))
        ));
        assert!(!gate.resolve(ObstacleKind::CryptoPromoter, Ok(())));
        assert!(!gate.is_ready());
        assert!(gate.resolve(ObstacleKind::FitnessPromoter, Ok(())));
        assert!(gate.is_ready());

        assert_eq!(gate.loaded_count(), 3);
        assert!(!gate.is_loaded(ObstacleKind::Marketer));
        assert_eq!(gate.status(ObstacleKind::Marketer), SpriteStatus::Failed);
    }

    #[test]
    fn test_duplicate_results_ignored() {
        let mut gate = AssetGate::new();
        gate.resolve(ObstacleKind::Solicitor, Ok(()));
        gate.resolve(
            ObstacleKind::Solicitor,
            Err(PlatformError::ImageLoad("x".into())),
        );
        assert!(gate.is_loaded(ObstacleKind::Solicitor));
    }
}
