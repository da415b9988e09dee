use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A named role controlling which dashboard is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
    pub dashboard_path: String,
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Persona {
    /// Initials shown in avatars ("Dr. Sarah Al-Rashid" -> "DSA").
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

impl Entity for Persona {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
    pub dashboard_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

fn persona(
    id: &str,
    name: &str,
    role: &str,
    department: &str,
    permissions: &[&str],
    description: &str,
) -> Persona {
    Persona {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        department: department.to_string(),
        dashboard_path: format!("/dashboards/{id}"),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        avatar: None,
        description: Some(description.to_string()),
    }
}

/// The four demo personas, in menu order.
pub fn seed_personas() -> Vec<Persona> {
    vec![
        persona(
            "cmo",
            "Dr. Sarah Al-Rashid",
            "Chief Medical Officer",
            "Executive",
            &["all"],
            "Strategic oversight of clinical operations and quality",
        ),
        persona(
            "quality",
            "Fatima Hassan",
            "Head of Quality",
            "Quality Assurance",
            &["quality", "audit", "compliance"],
            "Quality management and JCI compliance",
        ),
        persona(
            "nursing-supervisor",
            "Ahmed Mohammed",
            "Nursing Supervisor",
            "Nursing",
            &["nursing", "alerts", "patient-safety"],
            "Patient safety and nursing workflow optimization",
        ),
        persona(
            "him-coding",
            "Layla Ibrahim",
            "HIM/Coding Manager",
            "Health Information",
            &["coding", "documentation", "analytics"],
            "Medical coding and documentation integrity",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::find_by_id;

    #[test]
    fn seed_personas_route_to_their_dashboards() {
        let personas = seed_personas();
        assert_eq!(personas.len(), 4);
        let him = find_by_id(&personas, "him-coding").unwrap();
        assert_eq!(him.dashboard_path, "/dashboards/him-coding");
        assert_eq!(him.role, "HIM/Coding Manager");
    }

    #[test]
    fn initials_take_first_letter_of_each_word() {
        let cmo = seed_personas().remove(0);
        assert_eq!(cmo.initials(), "DSA");
    }
}
