use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    ReadWrite,
    ReadOnly,
}

/// Allowed values of a property: either an enumerated list (`yes | no`)
/// or a single free-text description (`IP/netmask`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Values {
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDefinition {
    #[serde(rename = "type")]
    pub mode: Mode,
    pub values: Option<Values>,
    pub default: Option<String>,
    pub description: String,
}

/// One property row attributed to one command path.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub name: String,
    pub command: String,
    pub info: PropertyDefinition,
}

/// Command path -> definition, kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct References(Vec<(String, PropertyDefinition)>);

impl References {
    /// Insert a definition, replacing any earlier one for the same command in place.
    pub fn upsert(&mut self, command: String, info: PropertyDefinition) {
        match self.0.iter_mut().find(|(c, _)| *c == command) {
            Some(entry) => entry.1 = info,
            None => self.0.push((command, info)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, command: &str) -> Option<&PropertyDefinition> {
        self.0.iter().find(|(c, _)| c == command).map(|(_, info)| info)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }
}

impl Serialize for References {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(c, info)| (c, info)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedProperty {
    pub name: String,
    pub references: References,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(description: &str) -> PropertyDefinition {
        PropertyDefinition {
            mode: Mode::ReadWrite,
            values: None,
            default: None,
            description: description.to_string(),
        }
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut refs = References::default();
        refs.upsert("/ip address".into(), def("first"));
        refs.upsert("/ipv6 address".into(), def("other"));
        refs.upsert("/ip address".into(), def("second"));

        assert_eq!(refs.len(), 2);
        assert_eq!(refs.get("/ip address").unwrap().description, "second");
        assert_eq!(refs.get("/ipv6 address").unwrap().description, "other");
        let order: Vec<&str> = refs.commands().collect();
        assert_eq!(order, vec!["/ip address", "/ipv6 address"]);
    }

    #[test]
    fn serializes_output_shape() {
        let mut references = References::default();
        references.upsert(
            "/interface ethernet".into(),
            PropertyDefinition {
                mode: Mode::ReadOnly,
                values: Some(Values::List(vec!["auto".into(), "68..65535".into()])),
                default: Some("auto".into()),
                description: "MTU".into(),
            },
        );
        references.upsert("/ip neighbor".into(), def("free"));
        let prop = AggregatedProperty { name: "mtu".into(), references };

        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "mtu",
                "references": {
                    "/interface ethernet": {
                        "type": "readonly",
                        "values": ["auto", "68..65535"],
                        "default": "auto",
                        "description": "MTU"
                    },
                    "/ip neighbor": {
                        "type": "readwrite",
                        "values": null,
                        "default": null,
                        "description": "free"
                    }
                }
            })
        );
    }

    #[test]
    fn text_values_serialize_as_string() {
        let info = PropertyDefinition {
            values: Some(Values::Text("string".into())),
            ..def("name")
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains(r#""values":"string""#));
    }
}
