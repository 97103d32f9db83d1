#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use bulwark_core::components::*;
    use bulwark_core::constants::*;
    use bulwark_core::enums::{DesignatorPhase, InterceptorTier, ThreatKind};
    use bulwark_core::types::{Position, Velocity};

    use crate::advance::*;
    use crate::guidance::{fan, lead_point, steer, wrap_angle};
    use crate::offspring::split_offspring;
    use crate::profiles::get_profile;

    fn threat(kind: ThreatKind) -> Threat {
        let profile = get_profile(kind);
        Threat {
            id: 1,
            kind,
            radius: profile.radius,
            age: 0,
            max_age: profile.max_age,
        }
    }

    fn body<'a>(
        threat: &'a mut Threat,
        position: &'a mut Position,
        velocity: &'a mut Velocity,
    ) -> ThreatBody<'a> {
        ThreatBody {
            threat,
            position,
            velocity,
            health: None,
            cloak: None,
            split: None,
            emitter: None,
            designation: None,
        }
    }

    #[test]
    fn test_every_kind_has_positive_radius_and_speed() {
        for kind in ThreatKind::ALL {
            let profile = get_profile(kind);
            assert!(profile.radius > 0.0, "{kind:?} radius");
            assert!(profile.speed_factor > 0.0, "{kind:?} speed");
        }
    }

    #[test]
    fn test_only_armored_is_multi_hit() {
        for kind in ThreatKind::ALL {
            assert_eq!(
                get_profile(kind).is_multi_hit(),
                kind == ThreatKind::Armored,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn test_offspring_kinds_never_split() {
        for kind in [ThreatKind::Swarmer, ThreatKind::Mirv] {
            let (child, _) = get_profile(kind).offspring.unwrap();
            assert!(get_profile(child).split_band.is_none());
        }
    }

    #[test]
    fn test_standard_moves_by_velocity_and_ages() {
        let mut t = threat(ThreatKind::Standard);
        let mut pos = Position::new(100.0, 10.0);
        let mut vel = Velocity::new(0.5, 1.5);
        let signal = body(&mut t, &mut pos, &mut vel).advance(&TickContext::default());
        assert_eq!(signal, BehaviorSignal::Idle);
        assert_eq!(pos, Position::new(100.5, 11.5));
        assert_eq!(t.age, 1);
    }

    #[test]
    fn test_hit_flash_counts_down() {
        let mut t = threat(ThreatKind::Armored);
        let mut pos = Position::new(100.0, 10.0);
        let mut vel = Velocity::new(0.0, 1.0);
        let mut health = Health {
            current: 2.0,
            max: 3.0,
            hit_flash: 2,
        };
        let mut b = body(&mut t, &mut pos, &mut vel);
        b.health = Some(&mut health);
        b.advance(&TickContext::default());
        b.advance(&TickContext::default());
        b.advance(&TickContext::default());
        assert_eq!(health.hit_flash, 0);
    }

    #[test]
    fn test_cloak_toggles_on_period() {
        let mut t = threat(ThreatKind::Stealth);
        let mut pos = Position::new(100.0, 10.0);
        let mut vel = Velocity::new(0.0, 1.0);
        let mut cloak = Cloak {
            visible: true,
            period: 3,
            timer: 0,
        };
        let mut b = body(&mut t, &mut pos, &mut vel);
        b.cloak = Some(&mut cloak);
        let ctx = TickContext::default();
        b.advance(&ctx);
        b.advance(&ctx);
        assert!(b.cloak.as_ref().unwrap().visible);
        b.advance(&ctx);
        assert!(!b.cloak.as_ref().unwrap().visible);
        b.advance(&ctx);
        b.advance(&ctx);
        b.advance(&ctx);
        assert!(cloak.visible);
    }

    #[test]
    fn test_split_fires_exactly_once() {
        let mut t = threat(ThreatKind::Mirv);
        let mut pos = Position::new(300.0, 199.0);
        let mut vel = Velocity::new(0.0, 1.0);
        let mut split = SplitCharge {
            split_y: 200.0,
            spent: false,
        };
        let mut b = body(&mut t, &mut pos, &mut vel);
        b.split = Some(&mut split);
        let ctx = TickContext::default();
        assert_eq!(b.advance(&ctx), BehaviorSignal::Split);
        assert_eq!(b.advance(&ctx), BehaviorSignal::Idle);
        assert_eq!(b.advance(&ctx), BehaviorSignal::Idle);
        assert!(split.spent);
    }

    #[test]
    fn test_decoy_emitter_fires_on_interval() {
        let mut t = threat(ThreatKind::DecoyDeployer);
        let mut pos = Position::new(300.0, 50.0);
        let mut vel = Velocity::new(0.0, 1.0);
        let mut emitter = DecoyEmitter {
            interval: 4,
            timer: 0,
        };
        let mut b = body(&mut t, &mut pos, &mut vel);
        b.emitter = Some(&mut emitter);
        let ctx = TickContext::default();
        let signals: Vec<_> = (0..8).map(|_| b.advance(&ctx)).collect();
        let emits = signals
            .iter()
            .filter(|s| **s == BehaviorSignal::EmitDecoy)
            .count();
        assert_eq!(emits, 2);
        assert_eq!(signals[3], BehaviorSignal::EmitDecoy);
    }

    #[test]
    fn test_designator_hovers_then_strikes_once() {
        let mut t = threat(ThreatKind::Designator);
        let mut pos = Position::new(280.0, 100.0);
        let mut vel = Velocity::new(0.0, 2.0);
        let mut designation = Designation {
            structure: 2,
            hover: (280.0, 104.0),
            phase: DesignatorPhase::Approach,
            timer: 0,
        };
        let mut b = body(&mut t, &mut pos, &mut vel);
        b.designation = Some(&mut designation);
        let ctx = TickContext::default();

        assert_eq!(b.advance(&ctx), BehaviorSignal::Idle);
        assert_eq!(
            b.advance(&ctx),
            BehaviorSignal::DesignationStarted { structure: 2 }
        );
        assert_eq!(*b.position, Position::new(280.0, 104.0));
        assert_eq!(b.velocity.speed(), 0.0);

        let mut strikes = 0;
        for _ in 0..(DESIGNATE_TICKS + 20) {
            if let BehaviorSignal::Strike { structure } = b.advance(&ctx) {
                assert_eq!(structure, 2);
                strikes += 1;
            }
        }
        assert_eq!(strikes, 1);
        assert_eq!(designation.phase, DesignatorPhase::Complete);
    }

    #[test]
    fn test_boss_bounces_inside_bounds() {
        let mut boss = Boss {
            health: 40.0,
            max_health: 40.0,
            spawn_cooldown: 1000,
            radius: BOSS_RADIUS,
            hit_flash: 0,
        };
        let mut pos = Position::new(BOSS_MAX_X - 1.0, BOSS_Y);
        let mut vel = Velocity::new(BOSS_SPEED, 0.0);
        let mut b = BossBody {
            boss: &mut boss,
            position: &mut pos,
            velocity: &mut vel,
        };
        let ctx = TickContext::default();
        b.advance(&ctx);
        assert!(b.velocity.x < 0.0);
        for _ in 0..2000 {
            b.advance(&ctx);
            assert!((BOSS_MIN_X..=BOSS_MAX_X).contains(&b.position.x));
        }
    }

    #[test]
    fn test_boss_spawns_drones_periodically() {
        let mut boss = Boss {
            health: 40.0,
            max_health: 40.0,
            spawn_cooldown: BOSS_SPAWN_INTERVAL,
            radius: BOSS_RADIUS,
            hit_flash: 0,
        };
        let mut pos = Position::new(400.0, BOSS_Y);
        let mut vel = Velocity::new(BOSS_SPEED, 0.0);
        let mut b = BossBody {
            boss: &mut boss,
            position: &mut pos,
            velocity: &mut vel,
        };
        let ctx = TickContext::default();
        let spawns = (0..BOSS_SPAWN_INTERVAL * 3)
            .filter(|_| b.advance(&ctx) == BossSignal::SpawnDrone)
            .count();
        assert_eq!(spawns, 3);
    }

    #[test]
    fn test_decoy_expires_after_life() {
        let mut decoy = Decoy {
            id: 1,
            radius: DECOY_RADIUS,
            life: 3,
        };
        let mut pos = Position::new(400.0, 200.0);
        let mut vel = Velocity::new(0.0, DECOY_DRIFT);
        let mut b = DecoyBody {
            decoy: &mut decoy,
            position: &mut pos,
            velocity: &mut vel,
        };
        let ctx = TickContext::default();
        assert_eq!(b.advance(&ctx), Lifespan::Alive);
        assert_eq!(b.advance(&ctx), Lifespan::Alive);
        assert_eq!(b.advance(&ctx), Lifespan::Expired);
    }

    #[test]
    fn test_tracer_expires_leaving_field() {
        let mut tracer = Tracer {
            radius: TRACER_RADIUS,
            life: TRACER_LIFE_TICKS,
        };
        let mut pos = Position::new(5.0, 300.0);
        let vel = Velocity::new(-TRACER_SPEED, 0.0);
        let mut b = TracerBody {
            tracer: &mut tracer,
            position: &mut pos,
            velocity: &vel,
        };
        assert_eq!(b.advance(&TickContext::default()), Lifespan::Expired);
    }

    fn interceptor(homing: bool, aim: (f64, f64)) -> Interceptor {
        Interceptor {
            target: None,
            aim,
            blast_radius: INTERCEPTOR_BASE_BLAST,
            speed: INTERCEPTOR_BASE_SPEED,
            tier: InterceptorTier::Standard,
            homing,
            retargeted: false,
            life: INTERCEPTOR_LIFE_TICKS,
        }
    }

    #[test]
    fn test_unguided_interceptor_reaches_aim() {
        let mut i = interceptor(false, (400.0, 450.0));
        let mut pos = Position::new(LAUNCHER_X, LAUNCHER_Y);
        let mut vel = Velocity::new(0.0, -INTERCEPTOR_BASE_SPEED);
        let mut b = InterceptorBody {
            interceptor: &mut i,
            position: &mut pos,
            velocity: &mut vel,
            target_position: None,
        };
        let ctx = TickContext::default();
        let mut reached = false;
        for _ in 0..100 {
            if b.advance(&ctx) == InterceptorSignal::ReachedAim {
                reached = true;
                break;
            }
        }
        assert!(reached);
        assert_eq!(*b.position, Position::new(400.0, 450.0));
    }

    #[test]
    fn test_homing_interceptor_with_lost_target_keeps_heading() {
        let mut i = interceptor(true, (0.0, 0.0));
        let mut pos = Position::new(400.0, 500.0);
        let mut vel = Velocity::new(0.0, -6.0);
        let mut b = InterceptorBody {
            interceptor: &mut i,
            position: &mut pos,
            velocity: &mut vel,
            target_position: None,
        };
        assert_eq!(
            b.advance(&TickContext::default()),
            InterceptorSignal::Flying
        );
        assert_eq!(*b.position, Position::new(400.0, 494.0));
    }

    #[test]
    fn test_interceptor_expires_at_end_of_life() {
        let mut i = interceptor(true, (0.0, 0.0));
        i.life = 1;
        let mut pos = Position::new(400.0, 300.0);
        let mut vel = Velocity::new(0.0, -6.0);
        let mut b = InterceptorBody {
            interceptor: &mut i,
            position: &mut pos,
            velocity: &mut vel,
            target_position: None,
        };
        assert_eq!(
            b.advance(&TickContext::default()),
            InterceptorSignal::Expired
        );
    }

    #[test]
    fn test_mine_arms_then_travels_to_bound() {
        let mut mine = Mine {
            arming: 2,
            launched: false,
            target: None,
            trigger_range: MINE_TRIGGER_RANGE,
            origin_y: GROUND_Y,
        };
        let mut pos = Position::new(300.0, GROUND_Y);
        let ctx = TickContext::default();
        {
            let mut b = MineBody {
                mine: &mut mine,
                position: &mut pos,
            };
            assert_eq!(b.advance(&ctx), MineSignal::Idle);
            assert_eq!(b.advance(&ctx), MineSignal::Armed);
            assert_eq!(b.advance(&ctx), MineSignal::Idle);
        }
        mine.launched = true;
        let mut b = MineBody {
            mine: &mut mine,
            position: &mut pos,
        };
        let mut ticks = 0;
        while b.advance(&ctx) != MineSignal::TravelBound {
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(GROUND_Y - pos.y >= MINE_TRAVEL_BOUND);
    }

    #[test]
    fn test_swarmer_splits_into_six_downward_drones() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let kids = split_offspring(
            ThreatKind::Swarmer,
            Position::new(300.0, 250.0),
            Velocity::new(0.0, 1.0),
            &mut rng,
        );
        assert_eq!(kids.len(), SWARMER_OFFSPRING as usize);
        for kid in &kids {
            assert_eq!(kid.kind, ThreatKind::Drone);
            assert_eq!(kid.position, Position::new(300.0, 250.0));
            assert!(kid.velocity.y > 0.0, "drones fan downward");
            let speed = kid.velocity.speed();
            assert!((SWARM_SPEED_MIN - 1e-9..=SWARM_SPEED_MAX + 1e-9).contains(&speed));
        }
    }

    #[test]
    fn test_mirv_splits_into_three_standard() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let parent = Velocity::new(0.2, 1.5);
        let kids = split_offspring(ThreatKind::Mirv, Position::new(200.0, 220.0), parent, &mut rng);
        assert_eq!(kids.len(), 3);
        for kid in &kids {
            assert_eq!(kid.kind, ThreatKind::Standard);
            assert!((kid.velocity.x - parent.x).abs() <= MIRV_VX_JITTER + 1e-9);
            assert!(kid.velocity.y >= parent.y * MIRV_VY_SCALE.0 - 1e-9);
            assert!(kid.velocity.y <= parent.y * MIRV_VY_SCALE.1 + 1e-9);
        }
    }

    #[test]
    fn test_non_splitters_yield_no_offspring() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let kids = split_offspring(
            ThreatKind::Armored,
            Position::default(),
            Velocity::default(),
            &mut rng,
        );
        assert!(kids.is_empty());
    }

    #[test]
    fn test_steer_turn_is_rate_limited() {
        let pos = Position::new(0.0, 0.0);
        let vel = Velocity::new(6.0, 0.0);
        let target = Position::new(-100.0, 1.0);
        let out = steer(&pos, &vel, &target, 6.0, 0.12);
        assert!((out.heading() - vel.heading()).abs() <= 0.12 + 1e-9);
        assert!((out.speed() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_lead_point_stationary_target() {
        let (aim, tti) = lead_point(
            &Position::new(0.0, 0.0),
            &Position::new(90.0, 0.0),
            &Velocity::default(),
            9.0,
        );
        assert_eq!(aim, Position::new(90.0, 0.0));
        assert!((tti - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_lead_point_zero_speed_is_finite() {
        let (aim, tti) = lead_point(
            &Position::new(0.0, 0.0),
            &Position::new(10.0, 0.0),
            &Velocity::new(0.0, 1.0),
            0.0,
        );
        assert!(tti.is_finite());
        assert!(aim.y.is_finite());
    }

    #[test]
    fn test_fan_is_centred() {
        let angles = fan(1.0, 3, 0.1);
        assert_eq!(angles.len(), 3);
        assert!((angles[1] - 1.0).abs() < 1e-12);
        assert!((angles[0] + angles[2] - 2.0).abs() < 1e-12);
        assert_eq!(fan(0.5, 1, 0.1), vec![0.5]);
    }

    #[test]
    fn test_wrap_angle_range() {
        for raw in [-10.0, -3.2, 0.0, 3.2, 10.0] {
            let w = wrap_angle(raw);
            assert!(w > -std::f64::consts::PI - 1e-12 && w <= std::f64::consts::PI + 1e-12);
        }
    }
}
