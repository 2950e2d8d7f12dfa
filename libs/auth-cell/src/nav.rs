use serde::Serialize;

use shared_models::role::AppRole;

/// One sidebar entry. `roles` is the allowed-roles set; the filter below is
/// presentation-only — doctor-gated write handlers enforce the same rule
/// server-side.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub url: &'static str,
    pub roles: &'static [AppRole],
}

const BOTH: &[AppRole] = &[AppRole::Doctor, AppRole::Receptionist];
const DOCTOR_ONLY: &[AppRole] = &[AppRole::Doctor];

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { title: "Dashboard", url: "/dashboard", roles: BOTH },
    NavItem { title: "Registration", url: "/registration", roles: BOTH },
    NavItem { title: "Clinical Exam", url: "/clinical-exam", roles: DOCTOR_ONLY },
    NavItem { title: "Diagnosis & Tests", url: "/diagnosis", roles: DOCTOR_ONLY },
    NavItem { title: "Treatment", url: "/treatment", roles: DOCTOR_ONLY },
    NavItem { title: "Prescription", url: "/prescription", roles: DOCTOR_ONLY },
    NavItem { title: "Vaccination", url: "/vaccination", roles: BOTH },
    NavItem { title: "Billing", url: "/billing", roles: BOTH },
    NavItem { title: "Stock", url: "/stock", roles: BOTH },
    NavItem { title: "Appointments", url: "/appointments", roles: BOTH },
];

/// Filters the menu down to the entries the resolved role may see. An
/// unresolved role gets nothing.
pub fn nav_items_for(role: Option<AppRole>) -> Vec<&'static NavItem> {
    match role {
        Some(role) => NAV_ITEMS.iter().filter(|i| i.roles.contains(&role)).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receptionist_never_sees_doctor_modules() {
        let items = nav_items_for(Some(AppRole::Receptionist));
        let titles: Vec<&str> = items.iter().map(|i| i.title).collect();

        for doctor_only in ["Clinical Exam", "Diagnosis & Tests", "Treatment", "Prescription"] {
            assert!(!titles.contains(&doctor_only), "{} leaked to receptionist", doctor_only);
        }
        assert!(titles.contains(&"Registration"));
        assert!(titles.contains(&"Billing"));
        assert_eq!(items.len(), 6);
    }

    #[test]
    fn test_doctor_sees_every_module() {
        let items = nav_items_for(Some(AppRole::Doctor));
        assert_eq!(items.len(), NAV_ITEMS.len());
    }

    #[test]
    fn test_missing_role_hides_all_nav() {
        assert!(nav_items_for(None).is_empty());
    }
}
