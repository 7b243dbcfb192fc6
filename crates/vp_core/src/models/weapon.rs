use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub uuid: String,
    pub display_name: String,
    #[serde(default)]
    pub display_icon: Option<String>,
    /// Raw API tag, e.g. `EEquippableCategory::Rifle`.
    #[serde(default)]
    pub category: String,
}

impl Weapon {
    pub fn weapon_category(&self) -> Option<WeaponCategory> {
        WeaponCategory::from_api_tag(&self.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponCategory {
    Pistol,
    Smg,
    Shotgun,
    Rifle,
    Sniper,
    Heavy,
}

impl WeaponCategory {
    pub const ALL: [WeaponCategory; 6] = [
        WeaponCategory::Pistol,
        WeaponCategory::Smg,
        WeaponCategory::Shotgun,
        WeaponCategory::Rifle,
        WeaponCategory::Sniper,
        WeaponCategory::Heavy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeaponCategory::Pistol => "Pistol",
            WeaponCategory::Smg => "SMG",
            WeaponCategory::Shotgun => "Shotgun",
            WeaponCategory::Rifle => "Rifle",
            WeaponCategory::Sniper => "Sniper",
            WeaponCategory::Heavy => "Heavy",
        }
    }

    pub fn api_tag(&self) -> &'static str {
        match self {
            WeaponCategory::Pistol => "EEquippableCategory::Sidearm",
            WeaponCategory::Smg => "EEquippableCategory::SMG",
            WeaponCategory::Shotgun => "EEquippableCategory::Shotgun",
            WeaponCategory::Rifle => "EEquippableCategory::Rifle",
            WeaponCategory::Sniper => "EEquippableCategory::Sniper",
            WeaponCategory::Heavy => "EEquippableCategory::Heavy",
        }
    }

    pub fn from_api_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.api_tag() == tag)
    }
}

impl fmt::Display for WeaponCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeaponCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown weapon category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_category_from_api() {
        let json = r#"{
            "uuid": "9c82e19d",
            "displayName": "Vandal",
            "displayIcon": "https://media.valorant-api.com/weapons/9c82e19d/displayicon.png",
            "category": "EEquippableCategory::Rifle"
        }"#;
        let weapon: Weapon = serde_json::from_str(json).unwrap();
        assert_eq!(weapon.weapon_category(), Some(WeaponCategory::Rifle));
        assert_eq!(WeaponCategory::from_api_tag("EEquippableCategory::Sidearm"), Some(WeaponCategory::Pistol));
        assert_eq!(WeaponCategory::from_api_tag("EEquippableCategory::Melee"), None);
    }

    #[test]
    fn test_weapon_category_parse() {
        assert_eq!("smg".parse::<WeaponCategory>(), Ok(WeaponCategory::Smg));
        assert_eq!("Sniper".parse::<WeaponCategory>(), Ok(WeaponCategory::Sniper));
        assert!("knife".parse::<WeaponCategory>().is_err());
    }
}
