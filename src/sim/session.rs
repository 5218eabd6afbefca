//! Gameplay session
//!
//! Owns the world and controllers for one level and advances them in a
//! fixed per-tick order. Input is queued by the host and applied at the next
//! tick boundary so the world is never touched mid-step.

use glam::Vec2;

use super::contact::resolve_contacts;
use super::drawing::{ShieldDrawingController, TouchResponse};
use super::hazard::update_hazards;
use super::material::MaterialType;
use super::state::{HazardView, InputEvent, SessionPhase, ShieldView, Snapshot};
use super::world::PhysicsWorld;
use crate::consts::DANGER_RADIUS;
use crate::error::SessionError;
use crate::level::LevelDefinition;
use crate::settings::Settings;

/// One play-through of a level
pub struct GameplaySession {
    level: LevelDefinition,
    settings: Settings,
    world: PhysicsWorld,
    drawing: ShieldDrawingController,
    phase: SessionPhase,
    /// Seconds simulated so far
    elapsed: f32,
    safe: bool,
    in_danger: bool,
    celebrate_seconds: f32,
    /// Input waiting for the next tick
    pending: Vec<InputEvent>,
    time_ticks: u64,
}

impl GameplaySession {
    /// Set up a session: world, mascot, hazards, full draw budget, default
    /// material. Fails only if the world cannot hold the level's bodies.
    pub fn new(level: LevelDefinition, settings: Settings) -> Result<Self, SessionError> {
        if level.allowed_materials.is_empty() {
            log::warn!(
                "Level {} allows no materials, falling back to {}",
                level.id,
                MaterialType::default().as_str()
            );
        }

        let world = PhysicsWorld::initialize(&level, settings.max_bodies)?;
        let drawing = ShieldDrawingController::new(&level);

        log::info!(
            "Session started: level {} (survive {}s, {} draws, {} hazards)",
            level.id,
            level.time_to_survive,
            level.draw_limit,
            world.hazards().len()
        );

        Ok(Self {
            level,
            settings,
            world,
            drawing,
            phase: SessionPhase::Active,
            elapsed: 0.0,
            safe: false,
            in_danger: false,
            celebrate_seconds: 0.0,
            pending: Vec::new(),
            time_ticks: 0,
        })
    }

    /// Queue a touch event for the next tick
    pub fn push_input(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Select a material from a host-side picker
    pub fn select_material(&mut self, material: MaterialType) -> bool {
        self.drawing.select_material(material)
    }

    /// Advance the session by one frame
    pub fn tick(&mut self, frame_dt: f32) {
        let dt = self.settings.clamp_dt(frame_dt);
        self.time_ticks += 1;

        self.apply_input();

        self.elapsed += dt;

        if !self.safe && self.elapsed >= self.level.time_to_survive as f32 {
            self.safe = true;
            self.phase = SessionPhase::Safe;
            log::info!(
                "Level {} cleared after {:.2}s ({} draws left)",
                self.level.id,
                self.elapsed,
                self.drawing.remaining_draws()
            );
        }

        self.in_danger = self.hazard_near_mascot();

        update_hazards(&mut self.world);

        self.drawing.erode(dt);
        self.drawing.reap(&mut self.world);

        self.world.step(dt);

        let begins = self.world.drain_contact_begins();
        if !begins.is_empty() {
            resolve_contacts(&begins, self.world.hazards(), self.drawing.shields_mut());
            self.drawing.reap(&mut self.world);
        }

        if self.safe {
            self.celebrate_seconds += dt;
        } else {
            self.celebrate_seconds = 0.0;
        }
    }

    fn apply_input(&mut self) {
        let screen = self.settings.screen_size();
        for event in std::mem::take(&mut self.pending) {
            let response = self.drawing.handle(&event, screen, &mut self.world);
            if let TouchResponse::Committed { shield_id } = response {
                log::debug!("Tick {}: shield {} placed", self.time_ticks, shield_id);
            }
        }
    }

    fn hazard_near_mascot(&self) -> bool {
        let mascot = self.world.mascot_position();
        self.world.hazards().iter().any(|h| {
            self.world
                .body_position(h.handle)
                .is_some_and(|p| p.distance(mascot) < DANGER_RADIUS)
        })
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        let elapsed_seconds = self.elapsed.max(0.0) as u32;
        Snapshot {
            phase: self.phase,
            elapsed_seconds,
            seconds_left: self.level.time_to_survive.saturating_sub(elapsed_seconds),
            remaining_draws: self.drawing.remaining_draws(),
            selected_material: self.drawing.selected(),
            allowed_materials: self.drawing.allowed().to_vec(),
            safe: self.safe,
            in_danger: self.in_danger,
            celebrate_seconds: self.celebrate_seconds,
            mascot: self.world.mascot_position(),
            hazards: self
                .world
                .hazards()
                .iter()
                .filter_map(|h| {
                    Some(HazardView {
                        kind: h.kind,
                        position: self.world.body_position(h.handle)?,
                    })
                })
                .collect(),
            shields: self
                .drawing
                .shields()
                .iter()
                .map(|s| ShieldView {
                    id: s.id,
                    material: s.material,
                    durability: s.durability,
                    vertices: self.world.transform_points(s.handle, &s.points),
                })
                .collect(),
            stroke_preview: self.drawing.stroke().to_vec(),
        }
    }

    pub fn level(&self) -> &LevelDefinition {
        &self.level
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }

    pub fn is_in_danger(&self) -> bool {
        self.in_danger
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn mascot_position(&self) -> Vec2 {
        self.world.mascot_position()
    }

    pub fn drawing(&self) -> &ShieldDrawingController {
        &self.drawing
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::level::HazardDefinition;
    use crate::sim::HazardKind;

    /// Screen of 1000 x 1600 pixels: one world unit is 100 pixels
    fn settings() -> Settings {
        Settings::for_screen(1000.0, 1600.0)
    }

    /// World-space point to screen pixels for `settings()`
    fn px(x: f32, y: f32) -> (f32, f32) {
        (x * 100.0, (WORLD_HEIGHT - y) * 100.0)
    }

    fn hazard(kind: HazardKind, x: f32, y: f32) -> HazardDefinition {
        HazardDefinition {
            kind,
            position_x: x,
            position_y: y,
        }
    }

    fn draw(session: &mut GameplaySession, points: &[(f32, f32)]) {
        let (x, y) = px(points[0].0, points[0].1);
        session.push_input(InputEvent::down(x, y));
        for &(wx, wy) in &points[1..] {
            let (x, y) = px(wx, wy);
            session.push_input(InputEvent::drag(x, y));
        }
        let (x, y) = px(points[points.len() - 1].0, points[points.len() - 1].1);
        session.push_input(InputEvent::up(x, y));
    }

    #[test]
    fn test_rock_level_cleared_with_stone_shield() {
        let level = LevelDefinition {
            character_x: 2.0,
            hazards: vec![hazard(HazardKind::Rock, 8.5, 10.0)],
            ..LevelDefinition::new("rock", 12, 1)
        };
        let mut session = GameplaySession::new(level, settings()).unwrap();
        assert!(session.select_material(MaterialType::Stone));

        draw(&mut session, &[(6.0, 4.0), (6.5, 4.5), (7.0, 5.0)]);
        session.tick(SIM_DT);

        let snap = session.snapshot();
        assert_eq!(snap.remaining_draws, 0);
        assert_eq!(snap.shields.len(), 1);
        assert_eq!(snap.shields[0].material, MaterialType::Stone);
        assert_eq!(snap.shields[0].vertices.len(), 3);
        assert!(!snap.safe);

        while session.elapsed() < 12.0 {
            assert!(!session.is_safe());
            session.tick(SIM_DT);
        }

        let snap = session.snapshot();
        assert!(snap.safe);
        assert!(!snap.in_danger);
        assert_eq!(snap.phase, SessionPhase::Safe);
        assert_eq!(snap.seconds_left, 0);
        assert_eq!(snap.elapsed_seconds, 12);
    }

    #[test]
    fn test_safe_is_sticky() {
        let mut session = GameplaySession::new(LevelDefinition::new("sticky", 1, 0), settings()).unwrap();
        for _ in 0..59 {
            session.tick(SIM_DT);
        }
        assert!(!session.is_safe());
        // Reaching the target flips safe on that exact tick
        session.tick(SIM_DT * 1.5);
        assert!(session.is_safe());
        for _ in 0..120 {
            session.tick(SIM_DT);
            assert!(session.is_safe());
        }
        assert!(session.snapshot().celebrate_seconds > 1.9);
    }

    #[test]
    fn test_in_danger_tracks_proximity() {
        // Mascot rests on the ground near x=4; the wind drifts right past it
        let level = LevelDefinition {
            hazards: vec![hazard(HazardKind::Wind, 0.0, 1.6)],
            ..LevelDefinition::new("danger", 60, 0)
        };
        let mut session = GameplaySession::new(level, settings()).unwrap();

        let mut seen_danger = false;
        let mut seen_clear_after_danger = false;
        for _ in 0..1200 {
            session.tick(SIM_DT);
            let mascot = session.mascot_position();
            let wind = session.snapshot().hazards[0].position;
            // Flag uses positions from the start of the tick
            let near = mascot.distance(wind) < DANGER_RADIUS - 0.05;
            let far = mascot.distance(wind) > DANGER_RADIUS + 0.05;
            if near {
                assert!(session.is_in_danger());
                seen_danger = true;
            }
            if far && seen_danger {
                assert!(!session.is_in_danger());
                seen_clear_after_danger = true;
            }
        }
        assert!(seen_danger);
        assert!(seen_clear_after_danger);
    }

    #[test]
    fn test_hot_soup_melts_ice_once_per_contact() {
        let level = LevelDefinition {
            character_x: 1.0,
            hazards: vec![hazard(HazardKind::HotSoup, 5.0, 1.4)],
            ..LevelDefinition::new("soup", 30, 1)
        };
        let mut session = GameplaySession::new(level, settings()).unwrap();
        assert!(session.select_material(MaterialType::Ice));
        draw(&mut session, &[(4.5, 1.4), (5.5, 1.4)]);

        for _ in 0..60 {
            session.tick(SIM_DT);
        }

        let shield = &session.drawing().shields()[0];
        assert_eq!(shield.contact_hits, 1);
        let expected = 0.6 - HOT_SOUP_CONTACT_DAMAGE - session.elapsed() * ICE_EROSION_PER_SEC;
        assert!((shield.durability - expected).abs() < 1e-3);
    }

    #[test]
    fn test_exhausted_shield_removed_same_tick() {
        let mut session = GameplaySession::new(LevelDefinition::new("melt", 100, 1), settings()).unwrap();
        assert!(session.select_material(MaterialType::Ice));
        draw(&mut session, &[(2.0, 8.0), (3.0, 8.0)]);
        session.tick(SIM_DT);
        assert_eq!(session.drawing().shields().len(), 1);

        // 0.6 durability at 0.02/s melts in 30s; max_frame_dt caps each tick
        let mut last = session.drawing().shields()[0].durability;
        let mut ticks = 0;
        loop {
            session.tick(0.1);
            ticks += 1;
            match session.drawing().shields().first() {
                Some(shield) => {
                    assert!(shield.durability > 0.0);
                    assert!(shield.durability <= last);
                    last = shield.durability;
                }
                None => break,
            }
            assert!(ticks < 400, "ice never melted");
        }
        assert!(last - 0.1 * ICE_EROSION_PER_SEC <= 1e-4);
        assert!(session.snapshot().shields.is_empty());
    }

    #[test]
    fn test_soup_finishes_worn_ice_in_same_tick() {
        // Soup starts below the ground line and reaches the resting shield
        // after roughly 200 ticks, once erosion has taken ice below 0.4
        let level = LevelDefinition {
            character_x: 1.0,
            hazards: vec![hazard(HazardKind::HotSoup, 5.0, 0.2)],
            ..LevelDefinition::new("worn", 100, 1)
        };
        let mut session = GameplaySession::new(level, settings()).unwrap();
        assert!(session.select_material(MaterialType::Ice));
        draw(&mut session, &[(4.5, 2.0), (5.5, 2.0)]);
        session.tick(SIM_DT);
        let handle = session.drawing().shields()[0].handle;

        let mut last = session.drawing().shields()[0].durability;
        let mut removed = false;
        for _ in 0..400 {
            session.tick(0.1);
            match session.drawing().shields().first() {
                Some(shield) => {
                    assert_eq!(shield.contact_hits, 0);
                    last = shield.durability;
                }
                None => {
                    removed = true;
                    break;
                }
            }
        }

        assert!(removed, "worn ice survived the soup");
        // Worn below one hit, but erosion alone would not have finished it
        assert!(last < HOT_SOUP_CONTACT_DAMAGE);
        assert!(last > 0.1 * ICE_EROSION_PER_SEC);
        assert!(session.elapsed() < 29.0);
        assert!(session.snapshot().shields.is_empty());
        assert!(!session.world().contains_body(handle));
    }

    #[test]
    fn test_zero_materials_still_starts() {
        let level = LevelDefinition {
            allowed_materials: Vec::new(),
            hazards: vec![hazard(HazardKind::Bee, 1.0, 9.0)],
            ..LevelDefinition::new("empty", 5, 1)
        };
        let mut session = GameplaySession::new(level, settings()).unwrap();
        session.tick(SIM_DT);

        let snap = session.snapshot();
        assert_eq!(snap.selected_material, MaterialType::default());
        assert!(snap.allowed_materials.is_empty());
        assert_eq!(snap.hazards.len(), 1);
    }

    #[test]
    fn test_input_is_applied_on_next_tick() {
        let mut session = GameplaySession::new(LevelDefinition::new("queue", 10, 2), settings()).unwrap();
        draw(&mut session, &[(2.0, 8.0), (4.0, 8.0)]);
        assert_eq!(session.snapshot().remaining_draws, 2);
        session.tick(SIM_DT);
        assert_eq!(session.snapshot().remaining_draws, 1);
    }

    #[test]
    fn test_hud_tap_switches_material() {
        let level = LevelDefinition {
            allowed_materials: vec![MaterialType::Cloth, MaterialType::Ice],
            ..LevelDefinition::new("hud", 10, 1)
        };
        let mut session = GameplaySession::new(level, settings()).unwrap();
        assert_eq!(session.snapshot().selected_material, MaterialType::Cloth);

        let (x, y) = px(8.0, WORLD_HEIGHT - 0.6);
        session.push_input(InputEvent::down(x, y));
        session.push_input(InputEvent::up(x, y));
        session.tick(SIM_DT);

        let snap = session.snapshot();
        assert_eq!(snap.selected_material, MaterialType::Ice);
        assert_eq!(snap.remaining_draws, 1);
    }

    #[test]
    fn test_stroke_preview_visible_while_drawing() {
        let mut session = GameplaySession::new(LevelDefinition::new("preview", 10, 1), settings()).unwrap();
        let (x, y) = px(2.0, 8.0);
        session.push_input(InputEvent::down(x, y));
        let (x, y) = px(3.0, 8.0);
        session.push_input(InputEvent::drag(x, y));
        session.tick(SIM_DT);

        let preview = session.snapshot().stroke_preview;
        assert_eq!(preview.len(), 2);
        assert!((preview[1] - Vec2::new(3.0, 8.0)).length() < 1e-4);
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let mut session = GameplaySession::new(LevelDefinition::new("clamp", 10, 0), settings()).unwrap();
        session.tick(5.0);
        assert!((session.elapsed() - session.settings().max_frame_dt).abs() < 1e-6);
        session.tick(f32::NAN);
        session.tick(-1.0);
        assert!((session.elapsed() - session.settings().max_frame_dt).abs() < 1e-6);
        assert_eq!(session.time_ticks(), 3);
    }

    #[test]
    fn test_body_limit_fails_construction() {
        let level = LevelDefinition {
            hazards: vec![hazard(HazardKind::Rock, 8.0, 8.0)],
            ..LevelDefinition::new("tiny", 10, 1)
        };
        let settings = Settings {
            max_bodies: 2,
            ..settings()
        };
        assert!(matches!(
            GameplaySession::new(level, settings),
            Err(SessionError::World(_))
        ));
    }

    #[test]
    fn test_determinism() {
        let level = LevelDefinition {
            hazards: vec![
                hazard(HazardKind::Bee, 1.0, 9.0),
                hazard(HazardKind::Rock, 7.0, 12.0),
                hazard(HazardKind::Wind, 0.0, 6.0),
            ],
            ..LevelDefinition::new("det", 20, 2)
        };
        let mut s1 = GameplaySession::new(level.clone(), settings()).unwrap();
        let mut s2 = GameplaySession::new(level, settings()).unwrap();

        for session in [&mut s1, &mut s2] {
            draw(session, &[(5.0, 7.0), (6.0, 7.5), (7.0, 8.0)]);
            for _ in 0..180 {
                session.tick(SIM_DT);
            }
        }

        assert_eq!(s1.snapshot(), s2.snapshot());
    }
}
