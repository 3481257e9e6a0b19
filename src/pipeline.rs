/*
 * Behavior Pipeline Module
 *
 * An ordered, weighted list of steering rules owned by each agent. The
 * pipeline sums the weighted forces of its enabled rules and clamps the
 * result to the agent's steering budget. Rules are addressed by kind; a
 * pipeline never holds two rules of the same kind.
 */

use nannou::prelude::Vec2;
use rand::Rng;

use crate::agent::{Agent, Neighbor, Personality};
use crate::behavior::{Alignment, Behavior, BehaviorKind, Cohesion, ObstacleAvoidance, Separation, Swimming};
use crate::environment::Environment;
use crate::error::{SwarmError, SwarmResult};
use crate::mosquito::{Circling, SwarmAttraction};
use crate::vector::SteerVec;

/// Tuning shared by every agent of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorSettings {
    pub separation_weight: f32,
    pub separation_radius: f32,
    pub alignment_weight: f32,
    pub alignment_radius: f32,
    pub cohesion_weight: f32,
    pub cohesion_radius: f32,
    pub swimming_weight: f32,
    pub swimming_amplitude: f32,
    pub swimming_frequency: f32,
    pub avoidance_weight: f32,
    pub swarm_attraction_weight: f32,
    pub circling_weight: f32,
    pub circling_radius: f32,
    pub circling_angular_speed: f32,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            separation_weight: 3.5,
            separation_radius: 18.0,
            alignment_weight: 1.75,
            alignment_radius: 35.0,
            cohesion_weight: 1.0,
            cohesion_radius: 60.0,
            swimming_weight: 0.8,
            swimming_amplitude: 5.0,
            swimming_frequency: 4.0,
            avoidance_weight: 5.0,
            swarm_attraction_weight: 1.0,
            circling_weight: 1.0,
            circling_radius: 60.0,
            circling_angular_speed: 1.2,
        }
    }
}

#[derive(Debug, Clone)]
struct PipelineEntry {
    behavior: Behavior,
    enabled: bool,
}

#[derive(Debug, Clone)]
pub struct BehaviorPipeline {
    entries: Vec<PipelineEntry>,
    max_force: f32,
    // Tuning restored by reset_to_defaults
    defaults: Vec<Behavior>,
}

impl BehaviorPipeline {
    pub fn new(max_force: f32) -> Self {
        Self {
            entries: Vec::new(),
            max_force: max_force.max(0.0),
            defaults: Vec::new(),
        }
    }

    /// The standard rule set for a personality. Its tuning becomes the
    /// pipeline's defaults.
    pub fn for_personality(
        personality: Personality,
        settings: &BehaviorSettings,
        max_force: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let mut pipeline = Self::new(max_force);

        let rules: Vec<Behavior> = match personality {
            Personality::Fish => vec![
                Separation::new(settings.separation_weight, settings.separation_radius).into(),
                Alignment::new(settings.alignment_weight, settings.alignment_radius).into(),
                Cohesion::new(settings.cohesion_weight, settings.cohesion_radius).into(),
                Swimming::with_random_phase(
                    settings.swimming_weight,
                    settings.swimming_amplitude,
                    settings.swimming_frequency,
                    rng,
                )
                .into(),
            ],
            Personality::Swarming => vec![SwarmAttraction::new(settings.swarm_attraction_weight).into()],
            Personality::Circling => vec![Circling::new(
                settings.circling_weight,
                settings.circling_radius,
                settings.circling_angular_speed,
            )
            .into()],
        };

        for rule in rules {
            // Kinds above are distinct, so this cannot collide
            pipeline.push(rule);
        }
        pipeline.remember_defaults();
        pipeline
    }

    fn push(&mut self, behavior: Behavior) {
        self.entries.push(PipelineEntry {
            behavior,
            enabled: true,
        });
    }

    fn position(&self, kind: BehaviorKind) -> SwarmResult<usize> {
        self.entries
            .iter()
            .position(|entry| entry.behavior.kind() == kind)
            .ok_or(SwarmError::BehaviorNotFound(kind))
    }

    /// Records the current tuning as the state `reset_to_defaults` returns to.
    pub fn remember_defaults(&mut self) {
        self.defaults = self.entries.iter().map(|entry| entry.behavior.clone()).collect();
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    pub fn set_max_force(&mut self, max_force: f32) {
        self.max_force = max_force.max(0.0);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds in evaluation order.
    pub fn kinds(&self) -> impl Iterator<Item = BehaviorKind> + '_ {
        self.entries.iter().map(|entry| entry.behavior.kind())
    }

    pub fn has(&self, kind: BehaviorKind) -> bool {
        self.position(kind).is_ok()
    }

    pub fn add(&mut self, behavior: Behavior) -> SwarmResult<()> {
        let kind = behavior.kind();
        if self.has(kind) {
            return Err(SwarmError::DuplicateBehavior(kind));
        }
        self.push(behavior);
        Ok(())
    }

    pub fn remove(&mut self, kind: BehaviorKind) -> SwarmResult<Behavior> {
        let index = self.position(kind)?;
        Ok(self.entries.remove(index).behavior)
    }

    /// Swaps in a rule of the same kind, returning the old one.
    pub fn replace(&mut self, behavior: Behavior) -> SwarmResult<Behavior> {
        let index = self.position(behavior.kind())?;
        Ok(std::mem::replace(&mut self.entries[index].behavior, behavior))
    }

    pub fn get(&self, kind: BehaviorKind) -> SwarmResult<&Behavior> {
        let index = self.position(kind)?;
        Ok(&self.entries[index].behavior)
    }

    pub fn get_mut(&mut self, kind: BehaviorKind) -> SwarmResult<&mut Behavior> {
        let index = self.position(kind)?;
        Ok(&mut self.entries[index].behavior)
    }

    /// Adds obstacle avoidance unless it is already there.
    pub fn attach_obstacle_avoidance(&mut self, weight: f32) {
        if !self.has(BehaviorKind::ObstacleAvoidance) {
            self.push(ObstacleAvoidance::new(weight).into());
        }
    }

    /// Removes obstacle avoidance if present.
    pub fn detach_obstacle_avoidance(&mut self) {
        self.entries
            .retain(|entry| entry.behavior.kind() != BehaviorKind::ObstacleAvoidance);
    }

    pub fn weight(&self, kind: BehaviorKind) -> SwarmResult<f32> {
        Ok(self.get(kind)?.weight())
    }

    pub fn set_weight(&mut self, kind: BehaviorKind, weight: f32) -> SwarmResult<()> {
        if !weight.is_finite() {
            return Err(SwarmError::InvalidConfig(format!("{kind} weight must be finite, got {weight}")));
        }
        self.get_mut(kind)?.set_weight(weight);
        Ok(())
    }

    pub fn radius(&self, kind: BehaviorKind) -> SwarmResult<f32> {
        self.get(kind)?
            .radius()
            .ok_or_else(|| SwarmError::InvalidConfig(format!("{kind} has no radius")))
    }

    pub fn set_radius(&mut self, kind: BehaviorKind, radius: f32) -> SwarmResult<()> {
        if !radius.is_finite() {
            return Err(SwarmError::InvalidConfig(format!("{kind} radius must be finite, got {radius}")));
        }
        if self.get_mut(kind)?.set_radius(radius) {
            Ok(())
        } else {
            Err(SwarmError::InvalidConfig(format!("{kind} has no radius")))
        }
    }

    pub fn is_enabled(&self, kind: BehaviorKind) -> SwarmResult<bool> {
        let index = self.position(kind)?;
        Ok(self.entries[index].enabled)
    }

    pub fn set_enabled(&mut self, kind: BehaviorKind, enabled: bool) -> SwarmResult<()> {
        let index = self.position(kind)?;
        self.entries[index].enabled = enabled;
        Ok(())
    }

    /// Weighted sum of every enabled rule, clamped to `max_force`.
    pub fn combine(
        &self,
        agent: &Agent,
        neighbors: &[Neighbor],
        environment: &Environment<'_>,
        rng: &mut impl Rng,
    ) -> Vec2 {
        let mut total = Vec2::ZERO;

        for entry in self.entries.iter().filter(|entry| entry.enabled) {
            let weight = entry.behavior.weight();
            if weight == 0.0 {
                continue;
            }
            let force = entry.behavior.compute_force(agent, neighbors, environment, rng);
            // skip non-finite forces
            if force.x.is_finite() && force.y.is_finite() {
                total += force * weight;
            }
        }

        total.limit(self.max_force)
    }

    /// Steps the oscillators of every rule, enabled or not.
    pub fn advance(&mut self, dt: f32, rng: &mut impl Rng) {
        for entry in &mut self.entries {
            entry.behavior.advance(dt, rng);
        }
    }

    /// Restores remembered tuning for every rule that has a default and
    /// re-enables it. Rules added later are left alone.
    pub fn reset_to_defaults(&mut self) {
        for entry in &mut self.entries {
            let kind = entry.behavior.kind();
            if let Some(default) = self.defaults.iter().find(|d| d.kind() == kind) {
                entry.behavior = default.clone();
                entry.enabled = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentConfig;
    use crate::environment::StillEnvironment;
    use nannou::prelude::vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fish_pipeline(rng: &mut StdRng) -> BehaviorPipeline {
        BehaviorPipeline::for_personality(Personality::Fish, &BehaviorSettings::default(), 100.0, rng)
    }

    #[test]
    fn fish_pipeline_holds_the_flocking_rules_in_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let pipeline = fish_pipeline(&mut rng);
        let kinds: Vec<_> = pipeline.kinds().collect();
        assert_eq!(
            kinds,
            vec![
                BehaviorKind::Separation,
                BehaviorKind::Alignment,
                BehaviorKind::Cohesion,
                BehaviorKind::Swimming
            ]
        );
    }

    #[test]
    fn duplicate_and_missing_kinds_are_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pipeline = fish_pipeline(&mut rng);

        assert_eq!(
            pipeline.add(Separation::new(1.0, 10.0).into()),
            Err(SwarmError::DuplicateBehavior(BehaviorKind::Separation))
        );
        assert_eq!(
            pipeline.set_weight(BehaviorKind::Circling, 1.0),
            Err(SwarmError::BehaviorNotFound(BehaviorKind::Circling))
        );
        assert!(matches!(
            pipeline.set_radius(BehaviorKind::Swimming, 10.0),
            Err(SwarmError::InvalidConfig(_))
        ));
        assert!(matches!(
            pipeline.set_weight(BehaviorKind::Cohesion, f32::NAN),
            Err(SwarmError::InvalidConfig(_))
        ));
    }

    #[test]
    fn remove_and_replace_by_kind() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pipeline = fish_pipeline(&mut rng);

        let old = pipeline.replace(Cohesion::new(2.0, 10.0).into()).expect("cohesion present");
        assert_eq!(old.weight(), 1.0);
        assert_eq!(pipeline.weight(BehaviorKind::Cohesion), Ok(2.0));

        pipeline.remove(BehaviorKind::Alignment).expect("alignment present");
        assert!(!pipeline.has(BehaviorKind::Alignment));
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn obstacle_avoidance_attaches_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pipeline = fish_pipeline(&mut rng);

        pipeline.attach_obstacle_avoidance(5.0);
        pipeline.attach_obstacle_avoidance(5.0);
        assert_eq!(pipeline.kinds().filter(|k| *k == BehaviorKind::ObstacleAvoidance).count(), 1);

        pipeline.detach_obstacle_avoidance();
        pipeline.detach_obstacle_avoidance();
        assert!(!pipeline.has(BehaviorKind::ObstacleAvoidance));
    }

    #[test]
    fn combine_is_clamped_to_max_force() {
        let mut rng = StdRng::seed_from_u64(4);
        let world = StillEnvironment::default();
        let agent = AgentConfig {
            position: vec2(100.0, 100.0),
            velocity: Some(vec2(50.0, 0.0)),
            ..AgentConfig::default()
        }
        .build(&mut rng)
        .expect("valid config");

        let mut pipeline = fish_pipeline(&mut rng);
        pipeline.set_max_force(5.0);
        for kind in [BehaviorKind::Separation, BehaviorKind::Alignment, BehaviorKind::Cohesion] {
            pipeline.set_weight(kind, 50.0).expect("kind present");
        }

        let crowd = [
            Neighbor { position: vec2(104.0, 100.0), velocity: vec2(0.0, -50.0) },
            Neighbor { position: vec2(100.0, 130.0), velocity: vec2(-50.0, 0.0) },
        ];
        let force = pipeline.combine(&agent, &crowd, &world.view(), &mut rng);
        assert!(force.length() <= 5.0 + 1e-4);
        assert!(force.length() > 0.0);
    }

    #[test]
    fn disabled_rules_do_not_contribute() {
        let mut rng = StdRng::seed_from_u64(4);
        let world = StillEnvironment::default();
        let agent = AgentConfig {
            position: vec2(0.0, 0.0),
            velocity: Some(Vec2::ZERO),
            ..AgentConfig::default()
        }
        .build(&mut rng)
        .expect("valid config");

        let mut pipeline = BehaviorPipeline::new(100.0);
        pipeline.add(Separation::new(1.0, 20.0).into()).expect("empty pipeline");
        pipeline.set_enabled(BehaviorKind::Separation, false).expect("present");

        let crowd = [Neighbor { position: vec2(5.0, 0.0), velocity: Vec2::ZERO }];
        assert_eq!(pipeline.combine(&agent, &crowd, &world.view(), &mut rng), Vec2::ZERO);
    }

    #[test]
    fn reset_restores_remembered_tuning() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pipeline = fish_pipeline(&mut rng);

        pipeline.set_weight(BehaviorKind::Separation, 0.1).expect("present");
        pipeline.set_radius(BehaviorKind::Cohesion, 99.0).expect("present");
        pipeline.set_enabled(BehaviorKind::Alignment, false).expect("present");
        pipeline.reset_to_defaults();

        assert_eq!(pipeline.weight(BehaviorKind::Separation), Ok(3.5));
        assert_eq!(pipeline.radius(BehaviorKind::Cohesion), Ok(60.0));
        assert_eq!(pipeline.is_enabled(BehaviorKind::Alignment), Ok(true));
    }
}
