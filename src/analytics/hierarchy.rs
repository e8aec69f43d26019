//! Disaster Group -> Disaster Type breakdown for the sunburst

use crate::data::DisasterEvent;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeNode {
    pub name: String,
    pub total_affected: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupNode {
    pub name: String,
    pub types: Vec<TypeNode>,
}

impl GroupNode {
    pub fn total_affected(&self) -> u64 {
        self.types.iter().map(|t| t.total_affected).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeHierarchy {
    pub groups: Vec<GroupNode>,
}

impl TypeHierarchy {
    pub fn total_affected(&self) -> u64 {
        self.groups.iter().map(|g| g.total_affected()).sum()
    }
}

/// Build groups and types in first-appearance order; rows missing either level are skipped
pub fn type_hierarchy(events: &[&DisasterEvent]) -> TypeHierarchy {
    let mut hierarchy = TypeHierarchy::default();

    for event in events {
        let (Some(group), Some(kind)) = (&event.disaster_group, &event.disaster_type) else {
            continue;
        };

        let group_idx = match hierarchy.groups.iter().position(|g| &g.name == group) {
            Some(idx) => idx,
            None => {
                hierarchy.groups.push(GroupNode {
                    name: group.clone(),
                    types: Vec::new(),
                });
                hierarchy.groups.len() - 1
            }
        };
        let node = &mut hierarchy.groups[group_idx];

        match node.types.iter_mut().find(|t| &t.name == kind) {
            Some(type_node) => type_node.total_affected += event.affected(),
            None => node.types.push(TypeNode {
                name: kind.clone(),
                total_affected: event.affected(),
            }),
        }
    }

    hierarchy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(group: Option<&str>, kind: Option<&str>, affected: u64) -> DisasterEvent {
        DisasterEvent {
            disaster_group: group.map(String::from),
            disaster_type: kind.map(String::from),
            total_affected: Some(affected),
            ..DisasterEvent::new(2010)
        }
    }

    #[test]
    fn test_hierarchy_totals_roll_up() {
        let events = vec![
            event(Some("Natural"), Some("Flood"), 100),
            event(Some("Technological"), Some("Industrial accident"), 7),
            event(Some("Natural"), Some("Drought"), 40),
            event(Some("Natural"), Some("Flood"), 60),
            event(Some("Natural"), None, 1000),
            event(None, Some("Flood"), 1000),
        ];
        let refs: Vec<&DisasterEvent> = events.iter().collect();

        let hierarchy = type_hierarchy(&refs);
        assert_eq!(hierarchy.groups.len(), 2);

        let natural = &hierarchy.groups[0];
        assert_eq!(natural.name, "Natural");
        assert_eq!(
            natural.types,
            vec![
                TypeNode { name: "Flood".into(), total_affected: 160 },
                TypeNode { name: "Drought".into(), total_affected: 40 },
            ]
        );
        assert_eq!(natural.total_affected(), 200);
        assert_eq!(hierarchy.total_affected(), 207);
    }
}
