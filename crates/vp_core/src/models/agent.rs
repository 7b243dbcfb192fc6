//! Agent and role types.
//!
//! The serde shape mirrors the public game-data API so the same struct can be
//! decoded from the roster endpoint and stored verbatim in pick logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque agent identifier (the API's `uuid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Closed set of agent roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Duelist,
    Initiator,
    Controller,
    Sentinel,
}

impl Role {
    /// Fixed order used when forcing one pick per role.
    pub const ALL: [Role; 4] = [Role::Duelist, Role::Initiator, Role::Controller, Role::Sentinel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Duelist => "Duelist",
            Role::Initiator => "Initiator",
            Role::Controller => "Controller",
            Role::Sentinel => "Sentinel",
        }
    }

    /// Case-insensitive lookup; unknown names map to `None`.
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_name(s).ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// A playable character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub uuid: AgentId,
    pub display_name: String,
    #[serde(default)]
    pub display_icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_portrait: Option<String>,
    /// `None` when the source carries no role or a role outside the closed set.
    #[serde(default, with = "role_wire", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Agent {
    pub fn new(uuid: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            uuid: AgentId(uuid.into()),
            display_name: display_name.into(),
            display_icon: String::new(),
            full_portrait: None,
            role: Some(role),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.display_icon = icon.into();
        self
    }

    pub fn id(&self) -> &AgentId {
        &self.uuid
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// Display label for terminals: `Jett (Duelist)`.
    pub fn label(&self) -> String {
        match self.role {
            Some(role) => format!("{} ({})", self.display_name, role),
            None => self.display_name.clone(),
        }
    }
}

/// `role` travels as `{ "displayName": "Duelist" }` on the wire.
mod role_wire {
    use super::Role;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct RoleRef {
        #[serde(rename = "displayName", default)]
        display_name: String,
    }

    pub fn serialize<S: Serializer>(role: &Option<Role>, s: S) -> Result<S::Ok, S::Error> {
        role.map(|r| RoleRef { display_name: r.as_str().to_string() }).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Role>, D::Error> {
        let raw = Option::<RoleRef>::deserialize(d)?;
        Ok(raw.and_then(|r| Role::from_name(&r.display_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_from_name() {
        assert_eq!(Role::from_name("duelist"), Some(Role::Duelist));
        assert_eq!(Role::from_name(" Sentinel "), Some(Role::Sentinel));
        assert_eq!(Role::from_name("Support"), None);
        assert!("controller".parse::<Role>().is_ok());
    }

    #[test]
    fn test_decode_api_agent() {
        let raw = json!({
            "uuid": "add6443a",
            "displayName": "Jett",
            "description": "ignored",
            "displayIcon": "https://example.test/jett.png",
            "fullPortrait": null,
            "role": { "uuid": "r1", "displayName": "Duelist" },
            "isPlayableCharacter": true
        });

        let agent: Agent = serde_json::from_value(raw).unwrap();
        assert_eq!(agent.uuid, AgentId::new("add6443a"));
        assert_eq!(agent.display_name, "Jett");
        assert_eq!(agent.role, Some(Role::Duelist));
        assert!(agent.full_portrait.is_none());
    }

    #[test]
    fn test_unknown_or_missing_role_decodes_to_none() {
        let unknown: Agent = serde_json::from_value(json!({
            "uuid": "x", "displayName": "X", "role": { "displayName": "Support" }
        }))
        .unwrap();
        assert_eq!(unknown.role, None);

        let missing: Agent =
            serde_json::from_value(json!({ "uuid": "y", "displayName": "Y", "role": null }))
                .unwrap();
        assert_eq!(missing.role, None);
    }

    #[test]
    fn test_encode_uses_wire_shape() {
        let agent = Agent::new("1", "Sage", Role::Sentinel);
        let value = serde_json::to_value(&agent).unwrap();

        assert_eq!(value["displayName"], "Sage");
        assert_eq!(value["role"]["displayName"], "Sentinel");
        assert!(value.get("fullPortrait").is_none());
    }
}
