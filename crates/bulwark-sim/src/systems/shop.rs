//! Between-waves shop: pricing, availability and purchase effects.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_core::components::{Mine, Structure, Turret};
use bulwark_core::config::ShopCatalog;
use bulwark_core::constants::*;
use bulwark_core::enums::UpgradeKind;
use bulwark_core::events::GameEvent;
use bulwark_core::state::ShopItemView;

use crate::match_state::MatchState;
use crate::world_setup;

/// Price after the first-purchase discount, if it still applies.
pub fn price(catalog: &ShopCatalog, state: &MatchState, item: UpgradeKind) -> Option<u32> {
    let cost = catalog.cost(item, state.upgrades.level(item))?;
    if state.first_discount_used {
        Some(cost)
    } else {
        Some((cost as f64 * FIRST_PURCHASE_DISCOUNT).ceil() as u32)
    }
}

/// Why an item cannot be bought right now, or `Ok` if it can be.
pub fn availability(
    world: &World,
    catalog: &ShopCatalog,
    state: &MatchState,
    structures: &[Structure],
    item: UpgradeKind,
) -> Result<(), String> {
    if let Some(max) = catalog.max_level(item) {
        if state.upgrades.level(item) >= max {
            return Err(format!("{item:?} is at max level"));
        }
    }
    match item {
        UpgradeKind::Nuke if state.nuke_loaded => Err("nuke already loaded".to_string()),
        UpgradeKind::Scrambler if state.scrambler_active => {
            Err("scrambler already active".to_string())
        }
        UpgradeKind::Mine if world.query::<&Mine>().iter().count() >= MAX_MINES => {
            Err("mine limit reached".to_string())
        }
        UpgradeKind::Turret if world_setup::free_turret_slot(world).is_none() => {
            Err("no free turret slot".to_string())
        }
        UpgradeKind::StructureArmor if !structures.iter().any(|s| !s.destroyed && !s.armored) => {
            Err("no intact unarmored structure".to_string())
        }
        UpgradeKind::StructureRepair if !structures.iter().any(|s| s.destroyed) => {
            Err("no destroyed structure".to_string())
        }
        _ => Ok(()),
    }
}

/// Validate and apply one purchase. On rejection nothing changes.
pub fn purchase(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    catalog: &ShopCatalog,
    state: &mut MatchState,
    structures: &mut [Structure],
    item: UpgradeKind,
    events: &mut Vec<GameEvent>,
) -> Result<u32, String> {
    availability(world, catalog, state, structures, item)?;
    let cost = price(catalog, state, item).ok_or_else(|| format!("{item:?} is not for sale"))?;
    if state.currency < cost {
        return Err(format!(
            "{item:?} costs {cost}, only {} available",
            state.currency
        ));
    }

    state.currency -= cost;
    state.first_discount_used = true;

    match item {
        UpgradeKind::InterceptorSpeed
        | UpgradeKind::Multishot
        | UpgradeKind::BlastRadius
        | UpgradeKind::TurretFireRate => state.upgrades.raise(item),
        UpgradeKind::TurretRange => {
            state.upgrades.raise(item);
            let range = state.upgrades.turret_range();
            for (_entity, turret) in world.query_mut::<&mut Turret>() {
                turret.range = range;
            }
        }
        UpgradeKind::Nuke => state.nuke_loaded = true,
        UpgradeKind::Scrambler => state.scrambler_active = true,
        UpgradeKind::Mine => {
            let x = rng.gen_range(SPAWN_MARGIN..FIELD_WIDTH - SPAWN_MARGIN);
            world_setup::spawn_mine(world, x);
        }
        UpgradeKind::Turret => {
            if let Some(slot) = world_setup::free_turret_slot(world) {
                world_setup::spawn_turret(world, slot, state.upgrades.turret_range());
            }
        }
        UpgradeKind::StructureArmor => {
            if let Some(s) = structures.iter_mut().find(|s| !s.destroyed && !s.armored) {
                s.armored = true;
            }
        }
        UpgradeKind::StructureRepair => {
            if let Some((index, s)) = structures.iter_mut().enumerate().find(|(_, s)| s.destroyed)
            {
                s.destroyed = false;
                s.armored = false;
                s.rubble = 0;
                events.push(GameEvent::StructureRepaired { structure: index });
            }
        }
    }

    tracing::debug!(?item, cost, currency = state.currency, "purchase");
    events.push(GameEvent::ShopChanged);
    Ok(cost)
}

/// Per-item shop view for the UI.
pub fn views(
    world: &World,
    catalog: &ShopCatalog,
    state: &MatchState,
    structures: &[Structure],
) -> Vec<ShopItemView> {
    UpgradeKind::ALL
        .iter()
        .filter_map(|&item| {
            let cost = price(catalog, state, item)?;
            Some(ShopItemView {
                item,
                level: state.upgrades.level(item),
                cost,
                affordable: state.currency >= cost,
                available: availability(world, catalog, state, structures, item).is_ok(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn setup(currency: u32) -> (World, ChaCha8Rng, ShopCatalog, MatchState, Vec<Structure>) {
        let state = MatchState {
            currency,
            ..Default::default()
        };
        (
            World::new(),
            ChaCha8Rng::seed_from_u64(1),
            ShopCatalog::default(),
            state,
            world_setup::build_structures(false),
        )
    }

    #[test]
    fn test_first_purchase_discount_once() {
        let (mut world, mut rng, catalog, mut state, mut structures) = setup(1000);
        let mut events = Vec::new();
        let first = purchase(
            &mut world,
            &mut rng,
            &catalog,
            &mut state,
            &mut structures,
            UpgradeKind::Mine,
            &mut events,
        )
        .unwrap();
        let second = purchase(
            &mut world,
            &mut rng,
            &catalog,
            &mut state,
            &mut structures,
            UpgradeKind::Mine,
            &mut events,
        )
        .unwrap();
        assert_eq!(first, 40);
        assert_eq!(second, 50);
        assert_eq!(state.currency, 910);
        assert_eq!(world.query::<&Mine>().iter().count(), 2);
    }

    #[test]
    fn test_unaffordable_changes_nothing() {
        let (mut world, mut rng, catalog, mut state, mut structures) = setup(10);
        let mut events = Vec::new();
        let before = state.clone();
        let result = purchase(
            &mut world,
            &mut rng,
            &catalog,
            &mut state,
            &mut structures,
            UpgradeKind::Turret,
            &mut events,
        );
        assert!(result.is_err());
        assert_eq!(state.currency, before.currency);
        assert!(!state.first_discount_used);
        assert!(events.is_empty());
        assert_eq!(world.query::<&Turret>().iter().count(), 0);
    }

    #[test]
    fn test_nuke_unavailable_while_loaded() {
        let (mut world, mut rng, catalog, mut state, mut structures) = setup(1000);
        let mut events = Vec::new();
        purchase(
            &mut world,
            &mut rng,
            &catalog,
            &mut state,
            &mut structures,
            UpgradeKind::Nuke,
            &mut events,
        )
        .unwrap();
        assert!(state.nuke_loaded);
        let err = availability(&world, &catalog, &state, &structures, UpgradeKind::Nuke);
        assert!(err.is_err());
    }

    #[test]
    fn test_repair_needs_destroyed_structure() {
        let (mut world, mut rng, catalog, mut state, mut structures) = setup(1000);
        let mut events = Vec::new();
        assert!(availability(&world, &catalog, &state, &structures, UpgradeKind::StructureRepair)
            .is_err());
        structures[3].destroyed = true;
        structures[3].rubble = 2;
        purchase(
            &mut world,
            &mut rng,
            &catalog,
            &mut state,
            &mut structures,
            UpgradeKind::StructureRepair,
            &mut events,
        )
        .unwrap();
        assert!(!structures[3].destroyed);
        assert!(!structures[3].armored);
        assert!(events.contains(&GameEvent::StructureRepaired { structure: 3 }));
    }

    #[test]
    fn test_multishot_max_level() {
        let (mut world, mut rng, catalog, mut state, mut structures) = setup(100_000);
        let mut events = Vec::new();
        for _ in 0..3 {
            purchase(
                &mut world,
                &mut rng,
                &catalog,
                &mut state,
                &mut structures,
                UpgradeKind::Multishot,
                &mut events,
            )
            .unwrap();
        }
        assert_eq!(state.upgrades.volley(), 4);
        let views = views(&world, &catalog, &state, &structures);
        let multishot = views
            .iter()
            .find(|v| v.item == UpgradeKind::Multishot)
            .unwrap();
        assert!(!multishot.available);
        assert_eq!(multishot.level, 3);
    }

    #[test]
    fn test_turret_slots_limit() {
        let (mut world, mut rng, catalog, mut state, mut structures) = setup(100_000);
        let mut events = Vec::new();
        for _ in 0..2 {
            purchase(
                &mut world,
                &mut rng,
                &catalog,
                &mut state,
                &mut structures,
                UpgradeKind::Turret,
                &mut events,
            )
            .unwrap();
        }
        assert!(purchase(
            &mut world,
            &mut rng,
            &catalog,
            &mut state,
            &mut structures,
            UpgradeKind::Turret,
            &mut events,
        )
        .is_err());
    }
}
