//! Weapon randomizer: uniform pick among weapons of the selected categories.

use crate::models::{Weapon, WeaponCategory};
use crate::selection::pick_one;
use rand::Rng;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponPicker {
    categories: BTreeSet<WeaponCategory>,
}

impl Default for WeaponPicker {
    /// Every category selected.
    fn default() -> Self {
        Self { categories: WeaponCategory::ALL.into_iter().collect() }
    }
}

impl WeaponPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: impl IntoIterator<Item = WeaponCategory>) -> Self {
        Self { categories: categories.into_iter().collect() }
    }

    pub fn categories(&self) -> impl Iterator<Item = WeaponCategory> + '_ {
        self.categories.iter().copied()
    }

    pub fn is_selected(&self, category: WeaponCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Returns `true` if the category is now selected.
    pub fn toggle(&mut self, category: WeaponCategory) -> bool {
        if self.categories.remove(&category) {
            false
        } else {
            self.categories.insert(category);
            true
        }
    }

    /// Weapons whose category is selected. Unknown API tags never match.
    pub fn pool<'a>(&self, weapons: &'a [Weapon]) -> Vec<&'a Weapon> {
        weapons
            .iter()
            .filter(|w| w.weapon_category().is_some_and(|c| self.categories.contains(&c)))
            .collect()
    }

    /// `None` when nothing matches the selection.
    pub fn pick<'a, R: Rng + ?Sized>(&self, weapons: &'a [Weapon], rng: &mut R) -> Option<&'a Weapon> {
        let pool = self.pool(weapons);
        let pick = pick_one(&pool, rng).copied();
        if pick.is_none() {
            log::debug!("Weapon pool empty for categories {:?}", self.categories);
        }
        pick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn weapon(name: &str, tag: &str) -> Weapon {
        Weapon {
            uuid: name.to_lowercase(),
            display_name: name.to_string(),
            display_icon: None,
            category: tag.to_string(),
        }
    }

    fn arsenal() -> Vec<Weapon> {
        vec![
            weapon("Classic", "EEquippableCategory::Sidearm"),
            weapon("Spectre", "EEquippableCategory::SMG"),
            weapon("Vandal", "EEquippableCategory::Rifle"),
            weapon("Phantom", "EEquippableCategory::Rifle"),
            weapon("Operator", "EEquippableCategory::Sniper"),
            weapon("Melee", "EEquippableCategory::Melee"),
        ]
    }

    #[test]
    fn test_default_selects_all_but_skips_unknown_tags() {
        let weapons = arsenal();
        let picker = WeaponPicker::new();
        let pool = picker.pool(&weapons);
        assert_eq!(pool.len(), 5);
        assert!(pool.iter().all(|w| w.display_name != "Melee"));
    }

    #[test]
    fn test_pick_respects_selection() {
        let weapons = arsenal();
        let picker = WeaponPicker::with_categories([WeaponCategory::Rifle]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            let pick = picker.pick(&weapons, &mut rng).unwrap();
            assert_eq!(pick.weapon_category(), Some(WeaponCategory::Rifle));
        }
    }

    #[test]
    fn test_empty_selection_picks_nothing() {
        let weapons = arsenal();
        let mut picker = WeaponPicker::with_categories([WeaponCategory::Heavy]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(picker.pick(&weapons, &mut rng).is_none());

        assert!(!picker.toggle(WeaponCategory::Heavy));
        assert_eq!(picker.categories().count(), 0);
        assert!(picker.toggle(WeaponCategory::Sniper));
        assert_eq!(picker.pick(&weapons, &mut rng).map(|w| w.display_name.as_str()), Some("Operator"));
    }
}
